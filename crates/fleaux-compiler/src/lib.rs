//! Fleaux compiler: resolution, materialization and Python emission.
//!
//! The compiler takes parsed modules from `fleaux-parser` and lowers them into
//! an owned IR ([`GeneratedModule`]), one module at a time, compiling imported
//! modules first. The IR is emitted as Python source by [`emit_python`].
//!
//! # Architecture
//!
//! ```text
//! Session::compile_root("Main")
//!   ├─ ModuleLoader::load            source text by module name
//!   ├─ Parser::parse                 arena AST
//!   ├─ referenced_modules            dependencies, compiled first (memoized)
//!   ├─ Materializer::run             AST -> GeneratedModule, names via Resolver
//!   └─ CompilationContext::record    module-seen table
//! ```
//!
//! # Example
//!
//! ```
//! use fleaux_compiler::{CompilerOptions, MemoryLoader, Session};
//!
//! let loader = MemoryLoader::new()
//!     .with("Main", "import Geometry;\n(3) -> Geometry.Square -> Println;")
//!     .with("Geometry", "let Square(x: Number): Number :: (x, 2) -> Pow;");
//!
//! let mut session = Session::new(CompilerOptions::default(), Box::new(loader));
//! let generated = session.compile_root("Main").unwrap();
//!
//! assert_eq!(generated, "fleaux_generated_module_Main");
//! assert_eq!(session.modules().len(), 2);
//! ```

pub mod builtins;
pub mod context;
pub mod emit;
pub mod ir;
pub mod loader;
pub mod materializer;
mod options;
pub mod resolver;
mod session;

pub use builtins::{STD_BUILTINS, is_builtin};
pub use context::{CompilationContext, ModuleRecord};
pub use emit::emit_python;
pub use ir::{
    GeneratedModule, Item, Literal, LoweredExpr, LoweredParam, LoweredType, MaterializedUnit,
    ReceiverRef,
};
pub use loader::{FsLoader, LoadError, MemoryLoader, ModuleLoader};
pub use materializer::Materializer;
pub use options::CompilerOptions;
pub use resolver::{Resolved, Resolver, referenced_modules};
pub use session::{Session, SessionError};
