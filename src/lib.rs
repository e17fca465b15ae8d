//! Fleaux: a pipeline-expression language transpiled to Python.
//!
//! This crate ties the phase crates together:
//!
//! - `fleaux-core` - spans, qualified names and the error taxonomy
//! - `fleaux-parser` - lexer and Pratt parser producing an arena AST
//! - `fleaux-compiler` - import resolution, materialization and Python emission
//! - `fleaux-runtime` - a reference evaluator for the lowered IR
//!
//! # Example
//!
//! ```
//! use fleaux::{CompilerOptions, MemoryLoader, Session, emit_python};
//!
//! let loader = MemoryLoader::new().with(
//!     "Main",
//!     "let Polynomial(x: Number): Number :: ((4, x) -> Multiply, 7) -> Add;\n\
//!      (4) -> Polynomial -> Println;",
//! );
//! let mut session = Session::new(CompilerOptions::default(), Box::new(loader));
//! let root = session.compile_root("Main").unwrap();
//!
//! let python = emit_python(session.module("Main").unwrap());
//! assert!(python.contains("def __fleaux_materialized_func_Polynomial_0(x: float) -> float:"));
//! assert_eq!(root, "fleaux_generated_module_Main");
//! ```

mod config;
mod driver;
pub mod logging;

pub use config::SessionConfig;
pub use driver::{Compiled, DriverError, compile_file, locate, run_file};

pub use fleaux_core::{
    FleauxError, LexError, MaterializationError, ParseError, ParseErrorKind, QualifiedName,
    ResolutionError, RuntimeError, Span,
};
pub use fleaux_parser::ast;
pub use fleaux_parser::{Lexer, Parser, Program, Token, TokenKind};

pub use fleaux_compiler::{
    CompilationContext, CompilerOptions, FsLoader, GeneratedModule, LoadError, MaterializedUnit,
    MemoryLoader, ModuleLoader, STD_BUILTINS, Session, SessionError, emit_python,
};
pub use fleaux_runtime::{Builtin, Bundle, CapturedOutput, Console, Interpreter, Value};
