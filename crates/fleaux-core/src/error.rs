//! Unified error types for Fleaux.
//!
//! This module provides a consistent error type hierarchy for all phases
//! of Fleaux processing: lexing, parsing, import resolution, materialization,
//! and reference evaluation.
//!
//! ## Error Hierarchy
//!
//! ```text
//! FleauxError (top-level wrapper)
//! ├── LexError              - Lexer/tokenization errors
//! ├── ParseError            - Parser errors (with ParseErrorKind)
//! ├── ResolutionError       - Module and name resolution errors
//! ├── MaterializationError  - Lowering/code generation errors
//! └── RuntimeError          - Reference evaluator errors
//! ```
//!
//! Every phase error is fatal to its compilation session. There is no
//! recovery and no multi-error reporting: the first failure wins.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// No token rule matches the character at this position.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },
}

impl LexError {
    /// Create an "unexpected character" error.
    pub fn unexpected_char(ch: char, span: Span) -> Self {
        LexError::UnexpectedChar { ch, span }
    }

    /// Create an "unterminated string" error.
    pub fn unterminated_string(span: Span) -> Self {
        LexError::UnterminatedString { span }
    }

    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// An expression was expected.
    ExpectedExpression,
    /// A type was expected.
    ExpectedType,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// A `let` header is malformed.
    InvalidLet,
    /// A statement was not terminated with `;`.
    MissingSemicolon,
    /// A literal value could not be parsed.
    InvalidLiteral,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::InvalidLet => "invalid let statement",
            ParseErrorKind::MissingSemicolon => "missing semicolon",
            ParseErrorKind::InvalidLiteral => "invalid literal",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location of the offending token.
    pub span: Span,
    /// A detailed error message naming what was expected and what was found.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span, expected: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            format!("expected {expected}, found end of file"),
        )
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Create an "expected type" error.
    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedType,
            span,
            format!("expected type, found {found}"),
        )
    }

    /// Format the error with source context for display.
    ///
    /// Renders the offending source line with a caret under the error span.
    pub fn display_with_source(&self, source: &str) -> String {
        render_with_source(&self.to_string(), self.span, source)
    }
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Errors raised while resolving modules and names.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// No source file exists for an imported or qualifying module.
    #[error("at {span}: unknown module '{name}'")]
    UnknownModule { name: String, span: Span },

    /// The module source exists but could not be read.
    #[error("at {span}: cannot read module '{name}': {message}")]
    ModuleUnreadable {
        name: String,
        message: String,
        span: Span,
    },

    /// A qualified reference names a member the module does not define.
    #[error("at {span}: module '{module}' has no member '{member}'")]
    UnresolvedMember {
        module: String,
        member: String,
        span: Span,
    },

    /// An unqualified name is neither a parameter, a binding, nor a builtin.
    #[error("at {span}: unresolved name '{name}'")]
    UnresolvedName { name: String, span: Span },

    /// A module reaches itself through its imports.
    #[error("at {span}: import cycle {}", chain.join(" -> "))]
    ImportCycle { chain: Vec<String>, span: Span },

    /// A `let` qualifies its name with a module other than its own.
    #[error("at {span}: cannot define '{qualifier}.{name}' inside module '{module}'")]
    ForeignDefinition {
        module: String,
        qualifier: String,
        name: String,
        span: Span,
    },
}

impl ResolutionError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ResolutionError::UnknownModule { span, .. }
            | ResolutionError::ModuleUnreadable { span, .. }
            | ResolutionError::UnresolvedMember { span, .. }
            | ResolutionError::UnresolvedName { span, .. }
            | ResolutionError::ImportCycle { span, .. }
            | ResolutionError::ForeignDefinition { span, .. } => *span,
        }
    }
}

// ============================================================================
// Materialization Errors
// ============================================================================

/// Errors raised while lowering statements into materialized units.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterializationError {
    /// Two parameters of one `let` share a name.
    #[error("at {span}: duplicate parameter '{name}' in '{function}'")]
    DuplicateParameter {
        function: String,
        name: String,
        span: Span,
    },

    /// The right side of a pipeline does not name a receiver.
    #[error("at {span}: {found} cannot receive a pipeline")]
    InvalidReceiver { found: String, span: Span },

    /// A parameter or binding name the Python target reserves.
    #[error("at {span}: '{name}' is a reserved word in generated code")]
    ReservedName { name: String, span: Span },
}

impl MaterializationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            MaterializationError::DuplicateParameter { span, .. }
            | MaterializationError::InvalidReceiver { span, .. }
            | MaterializationError::ReservedName { span, .. } => *span,
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised by the reference evaluator while running lowered code.
///
/// Bundle/arity mismatches are not caught at compile time; they surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A receiver was handed a bundle of the wrong size.
    #[error("{receiver} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        receiver: String,
        expected: String,
        got: usize,
    },

    /// An operand had the wrong type.
    #[error("type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// An index was outside the sequence.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// `In` was asked for a non-positive number of lines.
    #[error("{count} is not a valid input count")]
    InvalidInputCount { count: i64 },

    /// A string could not be parsed as a number.
    #[error("cannot parse '{text}' as a number")]
    InvalidNumber { text: String },

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The right side of a pipeline is not a receiver.
    #[error("{what} is not a pipe receiver")]
    NotAReceiver { what: String },

    /// A name had no binding when evaluated.
    #[error("name '{name}' is not bound")]
    Unbound { name: String },

    /// Console I/O failed.
    #[error("i/o error: {message}")]
    Io { message: String },

    /// Unit calls nested deeper than the evaluator allows.
    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    /// Repeating a sequence would exceed the evaluator's size limit.
    #[error("cannot repeat a sequence of length {len} {count} times")]
    RepetitionTooLarge { len: usize, count: i64 },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Top-level error wrapping every phase error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleauxError {
    /// A lexer error.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A parse error.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A resolution error.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A materialization error.
    #[error(transparent)]
    Materialization(#[from] MaterializationError),

    /// A runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl FleauxError {
    /// Check if this is a lexer error.
    pub fn is_lex(&self) -> bool {
        matches!(self, FleauxError::Lex(_))
    }

    /// Check if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, FleauxError::Parse(_))
    }

    /// Check if this is a resolution error.
    pub fn is_resolution(&self) -> bool {
        matches!(self, FleauxError::Resolution(_))
    }

    /// Check if this is a materialization error.
    pub fn is_materialization(&self) -> bool {
        matches!(self, FleauxError::Materialization(_))
    }

    /// Check if this is a runtime error.
    pub fn is_runtime(&self) -> bool {
        matches!(self, FleauxError::Runtime(_))
    }

    /// Source location of the error, when the phase tracks one.
    pub fn span(&self) -> Option<Span> {
        match self {
            FleauxError::Lex(e) => Some(e.span()),
            FleauxError::Parse(e) => Some(e.span),
            FleauxError::Resolution(e) => Some(e.span()),
            FleauxError::Materialization(e) => Some(e.span()),
            FleauxError::Runtime(_) => None,
        }
    }

    /// Format the error with source context for display.
    pub fn display_with_source(&self, source: &str) -> String {
        match self.span() {
            Some(span) => render_with_source(&self.to_string(), span, source),
            None => format!("error: {self}\n"),
        }
    }
}

/// Render a one-line message followed by the source line and a caret marker.
fn render_with_source(message: &str, span: Span, source: &str) -> String {
    let mut output = format!("error: {message}\n");

    if let Some(line_text) = source.lines().nth(span.line.saturating_sub(1) as usize) {
        output.push_str("  |\n");
        output.push_str(&format!("{:>3} | {}\n", span.line, line_text));

        let indent = " ".repeat(span.col.saturating_sub(1) as usize);
        let pointer = if span.len <= 1 {
            "^".to_string()
        } else {
            "^".to_string() + &"~".repeat((span.len - 1) as usize)
        };
        output.push_str(&format!("  | {indent}{pointer}\n"));
    }

    output
}

// ============================================================================
// Tests
// ============================================================================
