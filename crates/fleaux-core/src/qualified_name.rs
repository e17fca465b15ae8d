use std::fmt;

/// Qualified name for `let` bindings and references.
///
/// Fleaux has a single level of qualification: `Module.name`. A name without
/// a qualifier lives in the local (current module) scope.
///
/// # Examples
///
/// ```
/// use fleaux_core::QualifiedName;
///
/// let local = QualifiedName::local("Polynomial");
/// assert_eq!(local.to_string(), "Polynomial");
///
/// let member = QualifiedName::qualified("Std", "Println");
/// assert_eq!(member.to_string(), "Std.Println");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g., "Println", "Polynomial")
    pub name: String,
    /// Module qualifier, `None` for the local scope
    pub qualifier: Option<String>,
}

impl QualifiedName {
    /// Create a locally scoped name.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: None,
        }
    }

    /// Create a module-qualified name.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: Some(qualifier.into()),
        }
    }

    /// Create from a dotted string (e.g., "Std.Println").
    ///
    /// Splits on the first `.`; anything without a dot is local.
    pub fn parse(s: &str) -> Self {
        match s.split_once('.') {
            Some((qualifier, name)) => Self::qualified(qualifier, name),
            None => Self::local(s),
        }
    }

    /// Check if this name has no module qualifier.
    pub fn is_local(&self) -> bool {
        self.qualifier.is_none()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the module qualifier, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Identifier-safe rendering used inside generated names.
    ///
    /// `Std.Println` becomes `Std_Println`; local names are unchanged.
    pub fn mangled(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}_{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{q}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
