//! File-level entry points: compile a program to Python, or run it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fleaux_compiler::{GeneratedModule, SessionError, emit_python};
use fleaux_core::RuntimeError;
use fleaux_runtime::{Console, Interpreter, Value};
use thiserror::Error;

use crate::config::SessionConfig;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("'{}' does not name a source module", path.display())]
    InvalidPath { path: PathBuf },

    #[error("cannot write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Every module one compilation produced, dependencies first.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Generated name of the root module.
    pub root: String,
    pub modules: Vec<GeneratedModule>,
}

impl Compiled {
    pub fn root_module(&self) -> Option<&GeneratedModule> {
        self.modules.iter().find(|m| m.generated_name == self.root)
    }

    /// `(file name, Python source)` per module.
    pub fn emit(&self) -> Vec<(String, String)> {
        self.modules
            .iter()
            .map(|module| (module.file_name(), emit_python(module)))
            .collect()
    }

    /// Write one `.py` file per module into `out_dir`, returning the paths.
    pub fn write_to(&self, out_dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
        fs::create_dir_all(out_dir).map_err(|source| DriverError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;
        self.emit()
            .into_iter()
            .map(|(name, text)| {
                let path = out_dir.join(name);
                fs::write(&path, text).map_err(|source| DriverError::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "wrote module");
                Ok(path)
            })
            .collect()
    }
}

/// Split `dir/Name.ext` into a config rooted at `dir` and the module `Name`.
///
/// The file's extension replaces the configured one so imports resolve to
/// siblings with the same extension.
pub fn locate(path: &Path, config: &SessionConfig) -> Result<(SessionConfig, String), DriverError> {
    let invalid = || DriverError::InvalidPath {
        path: path.to_path_buf(),
    };
    let module = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    if module.is_empty() {
        return Err(invalid());
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut config = config.clone().source_dir(dir);
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        config = config.extension(ext);
    }
    Ok((config, module.to_string()))
}

/// Compile the program rooted at `path` and everything it imports.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_file(path: &Path, config: &SessionConfig) -> Result<Compiled, DriverError> {
    let (config, module) = locate(path, config)?;
    let mut session = config.session();
    let root = session.compile_root(&module)?;
    Ok(Compiled {
        root,
        modules: session.into_modules(),
    })
}

/// Compile then evaluate the program at `path` on `console`.
///
/// Returns the root module's top-level values.
pub fn run_file(
    path: &Path,
    config: &SessionConfig,
    console: Console,
) -> Result<Vec<Value>, DriverError> {
    let compiled = compile_file(path, config)?;
    let mut interp = Interpreter::new(console);
    Ok(interp.run(&compiled.modules)?)
}
