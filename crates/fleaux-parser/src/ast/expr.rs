//! Expression AST nodes for Fleaux.
//!
//! Expressions are literals, (qualified) identifier references, and unary
//! or binary operations. Parentheses only shape the tree and never appear as
//! nodes; tuples are chains of [`BinaryOp::Comma`] and pipelines are
//! [`BinaryOp::Pipeline`] nodes whose right side names a receiver.

use crate::ast::{BinaryOp, QualIdent, UnaryOp};
use fleaux_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Identifier reference, optionally module-qualified
    Ident(QualIdent<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Binary operation, including tuple-comma and pipeline
    Binary(&'ast BinaryExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Binary(e) => e.span,
        }
    }

    /// The binary node, if this expression is a use of `op`.
    pub fn as_binary(&self, op: BinaryOp) -> Option<&'ast BinaryExpr<'ast>> {
        match self {
            Self::Binary(b) if b.op == op => Some(b),
            _ => None,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    /// The literal kind
    pub kind: LiteralKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Numeral without fraction or exponent
    Int(i64),
    /// Integral numeral too large for `i64`, as written
    BigInt(&'ast str),
    /// Numeral with a fraction or exponent
    Float(f64),
    /// String contents between the quotes, escapes left as written
    String(&'ast str),
    /// `True` / `False`
    Bool(bool),
    /// `Null`
    Null,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
