//! Core types shared by every Fleaux compilation phase.
//!
//! - [`Span`] - source locations carried by tokens, AST nodes and errors
//! - [`QualifiedName`] - `Module.name` identities used for bindings
//! - The error taxonomy in [`error`]

pub mod error;
mod qualified_name;
mod span;

pub use error::{
    FleauxError, LexError, MaterializationError, ParseError, ParseErrorKind, ResolutionError,
    RuntimeError,
};
pub use qualified_name::QualifiedName;
pub use span::Span;
