//! Statement AST nodes for Fleaux.
//!
//! Every statement is terminated by `;`. A program is a flat sequence of
//! `let` definitions, `import` statements and bare expression statements.

use crate::ast::{Expr, Ident, QualIdent, TypeExpr};
use fleaux_core::Span;

/// A top-level statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `let Name(params): Type :: body;`
    Let(&'ast LetStmt<'ast>),
    /// `import Module;`
    Import(ImportStmt<'ast>),
    /// `expr;`
    Expr(ExprStmt<'ast>),
}

impl Stmt<'_> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Import(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// A named function definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetStmt<'ast> {
    /// The bound name, possibly qualified
    pub name: QualIdent<'ast>,
    /// Parameters in declaration order (never empty)
    pub params: &'ast [Param<'ast>],
    /// Declared return type
    pub return_type: TypeExpr<'ast>,
    /// The body expression
    pub body: &'ast Expr<'ast>,
    /// Source location, from `let` to the terminating `;`
    pub span: Span,
}

/// One `name : type` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    /// Parameter name
    pub name: Ident<'ast>,
    /// Declared type
    pub ty: TypeExpr<'ast>,
    /// Source location
    pub span: Span,
}

/// `import Module;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportStmt<'ast> {
    /// The imported module name
    pub module: Ident<'ast>,
    /// Source location
    pub span: Span,
}

/// A bare expression evaluated at module level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: &'ast Expr<'ast>,
    /// Source location, including the `;`
    pub span: Span,
}
