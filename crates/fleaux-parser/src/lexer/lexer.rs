//! Main lexer implementation for Fleaux.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s.
//! It uses direct dispatch based on the first character.
//!
//! The lexer copies all string content (identifiers, literals) into the arena,
//! allowing the source string to be freed after lexing completes.

use bumpalo::Bump;
use fleaux_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for Fleaux source code.
///
/// Produces tokens lazily, one per [`next_token`](Self::next_token) call,
/// skipping whitespace and `//` line comments. The stream can be rescanned
/// from the beginning with [`reset`](Self::reset).
///
/// The `'src` lifetime is the source string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated (persists).
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
    /// Kind of the last token produced, used to fold `-` into numerals.
    prev: Option<TokenKind>,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            prev: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize a whole source string.
    ///
    /// The returned vector always ends with an [`TokenKind::Eof`] token.
    /// Fails with the first lexical error encountered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn tokenize(source: &'src str, arena: &'ast Bump) -> Result<Vec<Token<'ast>>, LexError> {
        let mut lexer = Lexer::new(source, arena);
        let mut tokens = Vec::with_capacity(source.len() / 4 + 1);

        loop {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::Error => {
                    if let Some(error) = lexer.take_errors().into_iter().next() {
                        return Err(error);
                    }
                }
                TokenKind::Eof => {
                    tokens.push(token);
                    return Ok(tokens);
                }
                _ => tokens.push(token),
            }
        }
    }

    /// Rewind to the start of the source.
    pub fn reset(&mut self) {
        self.cursor = Cursor::new(self.cursor.source());
        self.prev = None;
        self.errors.clear();
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    ///
    /// Returns an `Eof` token once the input is exhausted, and keeps
    /// returning it on every further call.
    pub fn next_token(&mut self) -> Token<'ast> {
        let token = self.scan_token();
        if token.kind != TokenKind::Error {
            self.prev = Some(token.kind);
        }
        token
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    /// Scan the next token from source.
    fn scan_token(&mut self) -> Token<'ast> {
        self.skip_layout();

        let Some(first) = self.cursor.peek() else {
            return self.make_eof();
        };

        let start = Start {
            line: self.cursor.line(),
            col: self.cursor.column(),
            offset: self.cursor.offset(),
        };

        match first {
            '"' => self.scan_string(start),

            c if c.is_ascii_digit() => self.scan_number(start),

            '-' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                && self.minus_starts_numeral() =>
            {
                self.cursor.advance();
                self.scan_number(start)
            }

            c if is_ident_start(c) => self.scan_identifier(start),

            _ => self.scan_operator(start),
        }
    }

    /// Whether a `-` at the current position belongs to a numeric literal.
    fn minus_starts_numeral(&self) -> bool {
        !self.prev.is_some_and(TokenKind::ends_operand)
    }

    /// Skip whitespace, `//` comments and a leading BOM.
    fn skip_layout(&mut self) {
        if self.cursor.offset() == 0 && self.cursor.check_str("\u{FEFF}") {
            self.cursor.advance_bytes(3);
        }

        loop {
            self.cursor.eat_while(|c| c.is_whitespace());

            if self.cursor.check_str("//") {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    /// Create an EOF token.
    fn make_eof(&self) -> Token<'ast> {
        let span = Span::point(self.cursor.offset(), self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    /// Create a token from start position to current position.
    /// Copies the lexeme into the arena.
    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'ast> {
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start.offset));
        Token::new(kind, lexeme, start.span_to(self.cursor.offset()))
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'ast> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, "", span)
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a double-quoted string literal.
    ///
    /// `\"` is the only escape recognised while scanning; every other
    /// backslash sequence is kept verbatim in the lexeme. Strings may not
    /// span lines.
    fn scan_string(&mut self, start: Start) -> Token<'ast> {
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    let error = LexError::unterminated_string(start.span_to(self.cursor.offset()));
                    return self.make_error(error);
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.eat('"');
                }
                Some('"') => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    /// Scan a numeric literal after any folded sign.
    ///
    /// Shape: digits, optional `.digits`, optional exponent `e`/`E` with
    /// optional sign and at least one digit.
    fn scan_number(&mut self, start: Start) -> Token<'ast> {
        self.consume_digits();

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.consume_digits();
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let digit_at = match self.cursor.peek_nth(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.cursor.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.cursor.advance();
                }
                self.consume_digits();
            }
        }

        self.make_token(TokenKind::NumberLiteral, start)
    }

    fn consume_digits(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit());
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self, start: Start) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    /// Scan an operator or punctuation token.
    ///
    /// Two-character operators are matched before their one-character
    /// prefixes.
    fn scan_operator(&mut self, start: Start) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('-', Some('>')) => { self.cursor.advance(); TokenKind::Arrow }
            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('=', Some('=')) => { self.cursor.advance(); TokenKind::EqualEqual }
            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }
            (':', Some(':')) => { self.cursor.advance(); TokenKind::ColonColon }

            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('/', _) => TokenKind::Slash,
            ('*', _) => TokenKind::Star,
            ('%', _) => TokenKind::Percent,
            ('^', _) => TokenKind::Caret,
            ('!', _) => TokenKind::Bang,
            ('<', _) => TokenKind::Less,
            ('>', _) => TokenKind::Greater,
            (',', _) => TokenKind::Comma,
            ('.', _) => TokenKind::Dot,
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            (':', _) => TokenKind::Colon,
            (';', _) => TokenKind::Semicolon,

            _ => {
                let error = LexError::unexpected_char(c, start.span_to(self.cursor.offset()));
                return self.make_error(error);
            }
        };

        self.make_token(kind, start)
    }
}

/// Implement Iterator for convenient token streaming.
///
/// Yields every token up to, but not including, end of input.
impl<'src, 'ast> Iterator for Lexer<'src, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Where the token being scanned began.
#[derive(Clone, Copy)]
struct Start {
    line: u32,
    col: u32,
    offset: u32,
}

impl Start {
    fn span_to(self, end: u32) -> Span {
        Span::new(self.offset, self.line, self.col, end - self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to collect all tokens from source.
    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        let arena = Bump::new();
        Lexer::new(source, &arena)
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    /// Helper to get token kinds only.
    fn token_kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        Lexer::new(source, &arena).map(|t| t.kind).collect()
    }

    // =========================================
    // Basic tokens
    // =========================================

    #[test]
    fn empty_source() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("", &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn whitespace_and_comments_only() {
        assert!(token_kinds("  \n\t // nothing here\n// or here").is_empty());
    }

    #[test]
    fn identifiers_and_keywords() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("let import Polynomial _x1 Number String Bool Null Any True False"),
            vec![
                Let, Import, Identifier, Identifier, Number, String, Bool, Null, Any, True,
                False
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_identifier() {
        assert_eq!(
            tokenize("letter Numbers"),
            vec![
                (TokenKind::Identifier, "letter".into()),
                (TokenKind::Identifier, "Numbers".into()),
            ]
        );
    }

    #[test]
    fn number_literals() {
        let tokens = tokenize("42 3.14 1e10 2.5E-3 7e+2");
        let lexemes: Vec<_> = tokens.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(lexemes, vec!["42", "3.14", "1e10", "2.5E-3", "7e+2"]);
        assert!(tokens.iter().all(|(k, _)| *k == TokenKind::NumberLiteral));
    }

    #[test]
    fn incomplete_exponent_is_not_consumed() {
        assert_eq!(
            tokenize("1e"),
            vec![
                (TokenKind::NumberLiteral, "1".into()),
                (TokenKind::Identifier, "e".into()),
            ]
        );
    }

    #[test]
    fn leading_minus_folds_at_operand_start() {
        assert_eq!(
            tokenize("(-1, -2.5)"),
            vec![
                (TokenKind::LeftParen, "(".into()),
                (TokenKind::NumberLiteral, "-1".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::NumberLiteral, "-2.5".into()),
                (TokenKind::RightParen, ")".into()),
            ]
        );
    }

    #[test]
    fn minus_after_operand_is_operator() {
        use TokenKind::*;
        assert_eq!(token_kinds("x-1"), vec![Identifier, Minus, NumberLiteral]);
        assert_eq!(token_kinds("2 -1"), vec![NumberLiteral, Minus, NumberLiteral]);
        assert_eq!(token_kinds("(a) -1"), vec![LeftParen, Identifier, RightParen, Minus, NumberLiteral]);
    }

    #[test]
    fn minus_after_separator_folds() {
        use TokenKind::*;
        assert_eq!(token_kinds(":: -1"), vec![ColonColon, NumberLiteral]);
        assert_eq!(token_kinds("-1"), vec![NumberLiteral]);
        assert_eq!(token_kinds("x - -1"), vec![Identifier, Minus, NumberLiteral]);
        assert_eq!(token_kinds("- x"), vec![Minus, Identifier]);
    }

    #[test]
    fn string_literals() {
        let tokens = tokenize(r#""hello" "say \"hi\"" "a\nb""#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::StringLiteral, r#""hello""#.into()),
                (TokenKind::StringLiteral, r#""say \"hi\"""#.into()),
                (TokenKind::StringLiteral, r#""a\nb""#.into()),
            ]
        );
    }

    #[test]
    fn unterminated_string() {
        let arena = Bump::new();
        let err = Lexer::tokenize("\"never closed", &arena).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
        assert_eq!(err.span().col, 1);
    }

    #[test]
    fn string_cannot_span_lines() {
        let arena = Bump::new();
        let err = Lexer::tokenize("\"first\nsecond\"", &arena).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn line_comment() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("x // trailing -> y\n-> y"),
            vec![Identifier, Arrow, Identifier]
        );
    }

    #[test]
    fn multi_char_operators() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("-> <= >= == != && || ::"),
            vec![Arrow, LessEqual, GreaterEqual, EqualEqual, BangEqual, AmpAmp, PipePipe, ColonColon]
        );
    }

    #[test]
    fn single_char_operators() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("+ / * % ^ ! < > , . ( ) : ;"),
            vec![
                Plus, Slash, Star, Percent, Caret, Bang, Less, Greater, Comma, Dot, LeftParen,
                RightParen, Colon, Semicolon
            ]
        );
    }

    #[test]
    fn unexpected_character() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("x # y", &arena);

        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(lexer.has_errors());
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);

        let errors = lexer.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], LexError::unexpected_char('#', Span::new(2, 1, 3, 1)));
    }

    #[test]
    fn lone_ampersand_is_an_error() {
        let arena = Bump::new();
        let err = Lexer::tokenize("a & b", &arena).unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '&', .. }));
    }

    #[test]
    fn spans_track_lines() {
        let arena = Bump::new();
        let tokens = Lexer::tokenize("let\n  F", &arena).unwrap();
        assert_eq!(tokens[1].span, Span::new(6, 2, 3, 1));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
        assert_eq!(tokens[2].span.offset, 7);
    }

    #[test]
    fn reset_rescans_from_start() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("a -> -1", &arena);
        let first: Vec<_> = lexer.by_ref().map(|t| t.kind).collect();
        lexer.reset();
        let second: Vec<_> = lexer.map(|t| t.kind).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn tokens_and_layout_reconstruct_source() {
        let source = "let F(x: Number): Number :: (x, 5) -> Pow; // done\n  F(2);";
        let arena = Bump::new();
        let tokens = Lexer::tokenize(source, &arena).unwrap();

        let mut rebuilt = String::new();
        let mut cursor = 0usize;
        for token in &tokens {
            let range = token.span.range();
            rebuilt.push_str(&source[cursor..range.start]);
            assert_eq!(&source[range.clone()], token.lexeme);
            rebuilt.push_str(token.lexeme);
            cursor = range.end;
        }
        rebuilt.push_str(&source[cursor..]);

        assert_eq!(rebuilt, source);
    }

    #[test]
    fn let_statement() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("let Sq(x: Number): Number :: (x, 2) -> Std.Pow;"),
            vec![
                Let, Identifier, LeftParen, Identifier, Colon, Number, RightParen, Colon, Number,
                ColonColon, LeftParen, Identifier, Comma, NumberLiteral, RightParen, Arrow,
                Identifier, Dot, Identifier, Semicolon
            ]
        );
    }
}
