//! Common AST node types used throughout the parser.

use fleaux_core::{QualifiedName, Span};
use std::fmt;

/// An identifier with source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    /// The identifier name (allocated in arena).
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An optionally module-qualified identifier: `name` or `Module.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualIdent<'ast> {
    /// Module qualifier, `None` for the local scope.
    pub qualifier: Option<Ident<'ast>>,
    /// The simple name.
    pub name: Ident<'ast>,
    /// Source location covering qualifier and name.
    pub span: Span,
}

impl<'ast> QualIdent<'ast> {
    /// A locally scoped identifier.
    pub fn local(name: Ident<'ast>) -> Self {
        Self {
            qualifier: None,
            name,
            span: name.span,
        }
    }

    /// A module-qualified identifier.
    pub fn qualified(qualifier: Ident<'ast>, name: Ident<'ast>) -> Self {
        Self {
            qualifier: Some(qualifier),
            name,
            span: qualifier.span.merge(name.span),
        }
    }

    /// Check if this identifier has no module qualifier.
    pub fn is_local(&self) -> bool {
        self.qualifier.is_none()
    }

    /// Convert to an owned [`QualifiedName`].
    pub fn to_qualified_name(&self) -> QualifiedName {
        match self.qualifier {
            Some(q) => QualifiedName::qualified(q.name, self.name.name),
            None => QualifiedName::local(self.name.name),
        }
    }
}

impl fmt::Display for QualIdent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_ident_span_and_display() {
        let std = Ident::new("Std", Span::new(0, 1, 1, 3));
        let pow = Ident::new("Pow", Span::new(4, 1, 5, 3));
        let qual = QualIdent::qualified(std, pow);

        assert_eq!(qual.to_string(), "Std.Pow");
        assert_eq!(qual.span, Span::new(0, 1, 1, 7));
        assert!(!qual.is_local());
        assert_eq!(qual.to_qualified_name(), QualifiedName::qualified("Std", "Pow"));
    }

    #[test]
    fn local_ident() {
        let name = Ident::new("x", Span::new(3, 1, 4, 1));
        let qual = QualIdent::local(name);
        assert!(qual.is_local());
        assert_eq!(qual.to_string(), "x");
        assert_eq!(qual.to_qualified_name(), QualifiedName::local("x"));
    }
}
