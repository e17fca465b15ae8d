//! Statement and program parsing.
//!
//! ```text
//! program   := statement*
//! statement := ( let | import | expression ) ';'
//! let       := 'let' qual_ident '(' param ( ',' param )* ')' ':' type '::' expression
//! param     := Ident ':' type
//! import    := 'import' Ident
//! ```

use fleaux_core::{ParseError, ParseErrorKind, Span};

use super::parser::{Parser, found};
use crate::ast::{ExprStmt, ImportStmt, LetStmt, Param, Program, Stmt};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse statements until end of input.
    pub fn parse_program(&mut self) -> Result<Program<'ast>, ParseError> {
        let start = self.peek().span;
        let mut statements = bumpalo::collections::Vec::new_in(self.arena);

        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        let span = start.merge(self.peek().span);
        Ok(Program::new(statements.into_bump_slice(), span))
    }

    /// Parse one `;`-terminated statement.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let().map(Stmt::Let),
            TokenKind::Import => self.parse_import().map(Stmt::Import),
            _ => {
                let expr = self.parse_expr(0)?;
                let end = self.expect_semicolon("expression")?;
                Ok(Stmt::Expr(ExprStmt {
                    expr,
                    span: expr.span().merge(end),
                }))
            }
        }
    }

    /// Parse `let Name(params): Type :: body;`.
    fn parse_let(&mut self) -> Result<&'ast LetStmt<'ast>, ParseError> {
        let let_token = self.expect(TokenKind::Let)?;
        let name = self.parse_qual_ident()?;

        self.expect(TokenKind::LeftParen)?;
        if self.check(TokenKind::RightParen) {
            return Err(ParseError::new(
                ParseErrorKind::InvalidLet,
                self.peek().span,
                format!("'{name}' must declare at least one parameter"),
            ));
        }

        let mut params = bumpalo::collections::Vec::new_in(self.arena);
        params.push(self.parse_param()?);
        while self.eat(TokenKind::Comma).is_some() {
            params.push(self.parse_param()?);
        }
        self.expect(TokenKind::RightParen)?;

        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_type()?;

        if !self.check(TokenKind::ColonColon) {
            let token = *self.peek();
            return Err(ParseError::new(
                ParseErrorKind::InvalidLet,
                token.span,
                format!("expected '::' before the body of '{name}', found {}", found(&token)),
            ));
        }
        self.advance();

        let body = self.parse_expr(0)?;
        let end = self.expect_semicolon("let statement")?;

        Ok(self.arena.alloc(LetStmt {
            name,
            params: params.into_bump_slice(),
            return_type,
            body,
            span: let_token.span.merge(end),
        }))
    }

    /// Parse `name : type`.
    fn parse_param(&mut self) -> Result<Param<'ast>, ParseError> {
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param {
            name,
            ty,
            span: name.span.merge(ty.span()),
        })
    }

    /// Parse `import Module;`.
    fn parse_import(&mut self) -> Result<ImportStmt<'ast>, ParseError> {
        let import_token = self.expect(TokenKind::Import)?;
        let module = self.parse_ident()?;
        let end = self.expect_semicolon("import")?;
        Ok(ImportStmt {
            module,
            span: import_token.span.merge(end),
        })
    }

    /// Consume the terminating `;` of a statement.
    fn expect_semicolon(&mut self, after: &str) -> Result<Span, ParseError> {
        if let Some(token) = self.eat(TokenKind::Semicolon) {
            return Ok(token.span);
        }

        let token = *self.peek();
        Err(ParseError::new(
            ParseErrorKind::MissingSemicolon,
            token.span,
            format!("expected ';' after {after}, found {}", found(&token)),
        ))
    }
}
