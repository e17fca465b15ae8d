//! Expression parsing using Pratt parsing (precedence climbing).
//!
//! This module implements expression parsing with the operator precedence
//! and associativity table in [`crate::ast::ops`].

use fleaux_core::{ParseError, ParseErrorKind};

use super::parser::{Parser, found};
use crate::ast::expr::*;
use crate::ast::{BinaryOp, Ident, QualIdent, UnaryOp};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// This is the core of the Pratt parser. It handles operator precedence
    /// by only consuming operators with sufficient binding power.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = self.arena.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                left: lhs,
                op,
                right: rhs,
                span,
            })));
        }

        Ok(lhs)
    }

    /// Parse a prefix expression (the start of an expression).
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        if let Some(op) = UnaryOp::from_token(token.kind) {
            self.advance();
            let operand = self.parse_expr(op.binding_power())?;
            let span = token.span.merge(operand.span());
            return Ok(self.arena.alloc(Expr::Unary(self.arena.alloc(UnaryExpr {
                op,
                operand,
                span,
            }))));
        }

        let kind = match token.kind {
            TokenKind::NumberLiteral => {
                self.advance();
                parse_number(token.lexeme).ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::InvalidLiteral,
                        token.span,
                        format!("numeral '{}' is out of range", token.lexeme),
                    )
                })?
            }

            TokenKind::StringLiteral => {
                self.advance();
                let lexeme = token.lexeme;
                LiteralKind::String(&lexeme[1..lexeme.len() - 1])
            }

            TokenKind::True => {
                self.advance();
                LiteralKind::Bool(true)
            }

            TokenKind::False => {
                self.advance();
                LiteralKind::Bool(false)
            }

            TokenKind::Null => {
                self.advance();
                LiteralKind::Null
            }

            TokenKind::Identifier => {
                let ident = self.parse_qual_ident()?;
                return Ok(self.arena.alloc(Expr::Ident(ident)));
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }

            TokenKind::Eof => return Err(ParseError::unexpected_eof(token.span, "expression")),

            _ => return Err(ParseError::expected_expression(token.span, &found(&token))),
        };

        Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
            kind,
            span: token.span,
        })))
    }

    /// Parse `name` or `Module.name`.
    ///
    /// An identifier directly followed by `.` is always the qualifier of a
    /// qualified identifier, never a separate term.
    pub(super) fn parse_qual_ident(&mut self) -> Result<QualIdent<'ast>, ParseError> {
        let first = self.parse_ident()?;

        if self.eat(TokenKind::Dot).is_some() {
            let name = self.parse_ident()?;
            Ok(QualIdent::qualified(first, name))
        } else {
            Ok(QualIdent::local(first))
        }
    }

    /// Parse a plain identifier.
    pub(super) fn parse_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(Ident::new(token.lexeme, token.span))
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span, "identifier")),
            _ => Err(ParseError::expected_identifier(token.span, &found(&token))),
        }
    }
}

/// Convert a numeral lexeme to a literal.
///
/// Numerals with a fraction or exponent are floats; all others are integers.
fn parse_number(lexeme: &str) -> Option<LiteralKind<'_>> {
    if lexeme.contains(['.', 'e', 'E']) {
        lexeme.parse::<f64>().ok().filter(|v| v.is_finite()).map(LiteralKind::Float)
    } else {
        // the lexer only produces an optional sign followed by digits here
        Some(lexeme.parse::<i64>().map_or(LiteralKind::BigInt(lexeme), LiteralKind::Int))
    }
}
