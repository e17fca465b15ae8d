//! Type annotations for parameters and `let` return types.
//!
//! Types are descriptive metadata: they are carried into generated code as
//! annotations but never checked against pipeline operands.

use crate::ast::QualIdent;
use fleaux_core::Span;
use std::fmt;

/// A type annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// One of the built-in primitive names
    Primitive(PrimitiveType, Span),
    /// A user or module-qualified type name
    Named(QualIdent<'ast>),
    /// `(T1, T2, ...)` with at least one element
    Tuple(&'ast [TypeExpr<'ast>], Span),
}

impl TypeExpr<'_> {
    /// Get the span of this type.
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Primitive(_, span) => *span,
            TypeExpr::Named(name) => name.span,
            TypeExpr::Tuple(_, span) => *span,
        }
    }
}

impl fmt::Display for TypeExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive(p, _) => write!(f, "{p}"),
            TypeExpr::Named(name) => write!(f, "{name}"),
            TypeExpr::Tuple(elements, _) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Built-in primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Number,
    String,
    Bool,
    Null,
    Any,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveType::Number => "Number",
            PrimitiveType::String => "String",
            PrimitiveType::Bool => "Bool",
            PrimitiveType::Null => "Null",
            PrimitiveType::Any => "Any",
        };
        write!(f, "{}", s)
    }
}
