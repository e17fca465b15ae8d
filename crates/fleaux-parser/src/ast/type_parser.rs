//! Type annotation parsing.
//!
//! ```text
//! type := Number | String | Bool | Null | Any
//!       | Ident ( '.' Ident )?
//!       | '(' type ( ',' type )* ')'
//! ```

use fleaux_core::ParseError;

use super::parser::{Parser, found};
use crate::ast::{PrimitiveType, QualIdent, TypeExpr};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a type annotation.
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let token = *self.peek();

        let primitive = match token.kind {
            TokenKind::Number => PrimitiveType::Number,
            TokenKind::String => PrimitiveType::String,
            TokenKind::Bool => PrimitiveType::Bool,
            TokenKind::Null => PrimitiveType::Null,
            TokenKind::Any => PrimitiveType::Any,

            TokenKind::Identifier => {
                let name: QualIdent<'ast> = self.parse_qual_ident()?;
                return Ok(TypeExpr::Named(name));
            }

            TokenKind::LeftParen => return self.parse_tuple_type(),

            TokenKind::Eof => return Err(ParseError::unexpected_eof(token.span, "type")),

            _ => return Err(ParseError::expected_type(token.span, &found(&token))),
        };

        self.advance();
        Ok(TypeExpr::Primitive(primitive, token.span))
    }

    /// Parse `( T1, T2, ... )`. A single element still forms a 1-tuple.
    fn parse_tuple_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;

        let mut elements = bumpalo::collections::Vec::new_in(self.arena);
        elements.push(self.parse_type()?);
        while self.eat(TokenKind::Comma).is_some() {
            elements.push(self.parse_type()?);
        }

        let close = self.expect(TokenKind::RightParen)?;
        Ok(TypeExpr::Tuple(
            elements.into_bump_slice(),
            open.span.merge(close.span),
        ))
    }
}
