//! Module source loading.
//!
//! A session never touches the file system directly; it asks a
//! [`ModuleLoader`] for the source text of a module by name. [`FsLoader`]
//! reads sibling files, [`MemoryLoader`] serves tests and embedders.

use std::io;
use std::path::{Path, PathBuf};

use fleaux_core::{ResolutionError, Span};
use rustc_hash::FxHashMap;

/// Why a module's source could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No source exists for the module.
    NotFound,
    /// The source exists but reading it failed.
    Unreadable(String),
}

impl LoadError {
    /// Attach the module name and the referencing span.
    pub fn into_resolution(self, module: &str, span: Span) -> ResolutionError {
        match self {
            LoadError::NotFound => ResolutionError::UnknownModule {
                name: module.to_string(),
                span,
            },
            LoadError::Unreadable(message) => ResolutionError::ModuleUnreadable {
                name: module.to_string(),
                message,
                span,
            },
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Unreadable(err.to_string()),
        }
    }
}

/// Produces module source text by module name.
pub trait ModuleLoader {
    /// Load the source of `module`.
    fn load(&self, module: &str) -> Result<String, LoadError>;
}

/// Loads `<dir>/<Module>.<extension>`.
#[derive(Debug, Clone)]
pub struct FsLoader {
    dir: PathBuf,
    extension: String,
}

impl FsLoader {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Directory modules are resolved against.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the source of `module` is read from.
    pub fn path_of(&self, module: &str) -> PathBuf {
        self.dir.join(format!("{module}.{}", self.extension))
    }
}

impl ModuleLoader for FsLoader {
    fn load(&self, module: &str) -> Result<String, LoadError> {
        let path = self.path_of(module);
        tracing::debug!(module, path = %path.display(), "loading module source");
        Ok(std::fs::read_to_string(path)?)
    }
}

/// In-memory module table.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, module: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(module, source);
        self
    }

    pub fn insert(&mut self, module: impl Into<String>, source: impl Into<String>) {
        self.sources.insert(module.into(), source.into());
    }
}

impl ModuleLoader for MemoryLoader {
    fn load(&self, module: &str) -> Result<String, LoadError> {
        self.sources.get(module).cloned().ok_or(LoadError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_loader() {
        let loader = MemoryLoader::new().with("Geometry", "let Area(r: Number): Number :: r;");
        assert!(loader.load("Geometry").unwrap().starts_with("let Area"));
        assert_eq!(loader.load("Missing"), Err(LoadError::NotFound));
    }

    #[test]
    fn fs_loader_reads_sibling_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Geometry.fleaux"), "import Std;").unwrap();

        let loader = FsLoader::new(dir.path(), "fleaux");
        assert_eq!(loader.load("Geometry").unwrap(), "import Std;");
        assert_eq!(loader.load("Algebra"), Err(LoadError::NotFound));
    }

    #[test]
    fn load_error_conversion() {
        let span = Span::new(0, 1, 1, 6);
        let err = LoadError::NotFound.into_resolution("Geometry", span);
        assert_eq!(
            err,
            ResolutionError::UnknownModule {
                name: "Geometry".into(),
                span,
            }
        );

        let err = LoadError::Unreadable("permission denied".into()).into_resolution("Geometry", span);
        assert!(err.to_string().contains("permission denied"));
    }
}
