//! Session configuration.

use std::path::{Path, PathBuf};

use fleaux_compiler::{CompilerOptions, FsLoader, Session};

/// Where sources live and how generated modules are named.
///
/// ```
/// use fleaux::SessionConfig;
///
/// let config = SessionConfig::new("programs").extension("flx");
/// assert_eq!(config.options().source_file("Main"), "Main.flx");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    source_dir: PathBuf,
    options: CompilerOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SessionConfig {
    /// Configuration resolving imports against `source_dir`.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            options: CompilerOptions::default(),
        }
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Source file extension, without the dot.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.options.extension = extension.into();
        self
    }

    /// Name of the builtin module in source and in generated code.
    pub fn std_module(mut self, source: impl Into<String>, generated: impl Into<String>) -> Self {
        self.options.std_module = source.into();
        self.options.std_generated = generated.into();
        self
    }

    pub fn output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.output_prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// A fresh session loading modules from the configured directory.
    pub fn session(&self) -> Session {
        let loader = FsLoader::new(self.source_dir.clone(), self.options.extension.clone());
        Session::new(self.options.clone(), Box::new(loader))
    }
}

impl From<SessionConfig> for CompilerOptions {
    fn from(config: SessionConfig) -> Self {
        config.options
    }
}
