//! Parser infrastructure for Fleaux.
//!
//! Provides the main [`Parser`] struct with token navigation and the public
//! entry points for parsing whole programs, single expressions and types.

use bumpalo::Bump;
use fleaux_core::{FleauxError, ParseError};

use crate::ast::{Expr, Program, TypeExpr};
use crate::lexer::{Lexer, Token, TokenKind};

/// The main parser for Fleaux source code.
///
/// The whole source is tokenized up front; the parser then walks the token
/// buffer with arbitrary lookahead. The first lexical or syntax error aborts
/// parsing: there is no recovery.
///
/// The `'ast` lifetime refers to the arena where AST nodes and token
/// lexemes are allocated.
pub struct Parser<'ast> {
    /// Tokens, always terminated by `Eof`
    pub(super) buffer: Vec<Token<'ast>>,
    /// Current position in the buffer
    pub(super) position: usize,
    /// Arena allocator for AST nodes
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Create a new parser for the given source code.
    ///
    /// Fails with the first lexical error in the source.
    pub fn new(source: &str, arena: &'ast Bump) -> Result<Self, FleauxError> {
        let buffer = Lexer::tokenize(source, arena)?;
        Ok(Self {
            buffer,
            position: 0,
            arena,
        })
    }

    /// Parse a complete program.
    ///
    /// # Example
    ///
    /// ```
    /// use bumpalo::Bump;
    /// use fleaux_parser::Parser;
    ///
    /// let arena = Bump::new();
    /// let program = Parser::parse("let F(x: Number): Number :: (x, 5) -> Pow;", &arena).unwrap();
    /// assert_eq!(program.statements().len(), 1);
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<Program<'ast>, FleauxError> {
        let mut parser = Parser::new(source, arena)?;
        let program = parser.parse_program()?;
        tracing::debug!(
            statements = program.statements().len(),
            tokens = parser.buffer.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Parse a single expression that must span the whole source.
    pub fn expression(source: &str, arena: &'ast Bump) -> Result<&'ast Expr<'ast>, FleauxError> {
        let mut parser = Parser::new(source, arena)?;
        let expr = parser.parse_expr(0)?;
        parser.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    /// Parse a single type that must span the whole source.
    pub fn type_expr(source: &str, arena: &'ast Bump) -> Result<TypeExpr<'ast>, FleauxError> {
        let mut parser = Parser::new(source, arena)?;
        let ty = parser.parse_type()?;
        parser.expect(TokenKind::Eof)?;
        Ok(ty)
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek ahead n tokens without consuming.
    ///
    /// Looking past the end yields the `Eof` token.
    pub fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let last = self.buffer.len() - 1;
        &self.buffer[(self.position + n).min(last)]
    }

    /// Get the current token and advance to the next.
    ///
    /// The position never moves past `Eof`.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Check if the current token is EOF.
    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// If the current token matches the given kind, consume it and return Some.
    /// Otherwise, return None without consuming.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be of the given kind.
    /// If it matches, consume and return it. Otherwise, return an error.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let token = *self.peek();
        if token.kind == TokenKind::Eof {
            Err(ParseError::unexpected_eof(token.span, kind.description()))
        } else {
            Err(ParseError::expected_token(
                token.span,
                &kind.to_string(),
                &found(&token),
            ))
        }
    }
}

/// Describe a token for "found ..." messages, quoting identifiers and literals.
pub(super) fn found(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::NumberLiteral | TokenKind::StringLiteral => {
            format!("{} '{}'", token.kind, token.lexeme)
        }
        _ => token.kind.to_string(),
    }
}
