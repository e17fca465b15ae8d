//! Abstract Syntax Tree (AST) for Fleaux.
//!
//! This module provides:
//! - AST node definitions for statements, expressions and types
//! - The operator table used by the expression parser
//! - [`Parser`], which turns source text into a [`Program`]
//!
//! All nodes live in a [`bumpalo::Bump`] arena and are immutable once built.

pub mod node;
pub mod ops;

mod parser;
mod type_parser;
pub mod types;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub use expr::*;
pub use node::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;
pub use types::*;

use fleaux_core::Span;

/// A parsed Fleaux program.
///
/// The program borrows from an arena allocator. All AST nodes are allocated
/// in the arena and remain valid for the lifetime of the arena.
#[derive(Debug, Clone, Copy)]
pub struct Program<'ast> {
    statements: &'ast [Stmt<'ast>],
    span: Span,
}

impl<'ast> Program<'ast> {
    /// Create a new program from parsed statements.
    pub(crate) fn new(statements: &'ast [Stmt<'ast>], span: Span) -> Self {
        Self { statements, span }
    }

    /// Get the statements in source order.
    pub fn statements(&self) -> &'ast [Stmt<'ast>] {
        self.statements
    }

    /// Get the source location span of this program.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Iterate over the `let` definitions.
    pub fn lets(&self) -> impl Iterator<Item = &'ast LetStmt<'ast>> + '_ {
        self.statements.iter().filter_map(|stmt| match stmt {
            Stmt::Let(l) => Some(*l),
            _ => None,
        })
    }
}
