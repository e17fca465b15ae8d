//! Token types and definitions for the Fleaux lexer.

use fleaux_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is allocated.
/// This allows the source string to be freed after lexing, since all string
/// content is copied into the arena.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token (allocated in arena).
    pub lexeme: &'ast str,
    /// Location in source.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All possible token types in Fleaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Numeric literal: `42`, `-1`, `3.14`, `6.02e23`
    NumberLiteral,
    /// String literal: `"hello"`, `"say \"hi\""`
    StringLiteral,

    // =========================================
    // Identifiers
    // =========================================
    /// User-defined identifier
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    /// `let`
    Let,
    /// `import`
    Import,
    /// `Number`
    Number,
    /// `String`
    String,
    /// `Bool`
    Bool,
    /// `Null`
    Null,
    /// `Any`
    Any,
    /// `True`
    True,
    /// `False`
    False,

    // =========================================
    // Operators
    // =========================================
    /// `->`
    Arrow,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `::`
    ColonColon,

    // =========================================
    // Punctuation
    // =========================================
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,

    // =========================================
    // Special
    // =========================================
    /// End of input
    Eof,
    /// A character no rule matches
    Error,
}

impl TokenKind {
    /// Check if this token kind is a keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Let | Import | Number | String | Bool | Null | Any | True | False
        )
    }

    /// Check if this token kind is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(self, NumberLiteral | StringLiteral | True | False | Null)
    }

    /// Check if this token kind names a primitive type.
    pub fn is_primitive_type(self) -> bool {
        use TokenKind::*;
        matches!(self, Number | String | Bool | Null | Any)
    }

    /// Whether a token of this kind can be the last token of an operand.
    ///
    /// A `-` directly before a digit is folded into the numeral only when
    /// the previous token cannot end an operand, so `x-1` stays a subtraction
    /// while `(-1, 2)` holds a negative literal.
    pub fn ends_operand(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            NumberLiteral
                | StringLiteral
                | Identifier
                | True
                | False
                | Null
                | Number
                | String
                | Bool
                | Any
                | RightParen
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            NumberLiteral => "number literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            Let => "'let'",
            Import => "'import'",
            Number => "'Number'",
            String => "'String'",
            Bool => "'Bool'",
            Null => "'Null'",
            Any => "'Any'",
            True => "'True'",
            False => "'False'",
            Arrow => "'->'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Caret => "'^'",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Bang => "'!'",
            ColonColon => "'::'",
            Colon => "':'",
            Dot => "'.'",
            Comma => "','",
            Semicolon => "';'",
            LeftParen => "'('",
            RightParen => "')'",
            Eof => "end of file",
            Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Map a keyword string to its [`TokenKind`], or `None` if not a keyword.
///
/// Keywords are case-sensitive: `Number` is reserved, `number` is an
/// ordinary identifier.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "let" => Let,
        "import" => Import,
        "Number" => Number,
        "String" => String,
        "Bool" => Bool,
        "Null" => Null,
        "Any" => Any,
        "True" => True,
        "False" => False,
        _ => return None,
    })
}
