//! Type annotation parsing.

use sepia_diagnostic::ErrorCode;
use sepia_ir::ast::{ParsedType, ParsedTypeKind};
use sepia_ir::TokenKind;
use sepia_stack::ensure_sufficient_stack;

use crate::cursor::describe;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `IDENT | null | func ( types? ) (: type)?`
    pub(crate) fn parse_type(&mut self) -> Result<ParsedType, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.cursor.advance().span;
                Ok(ParsedType {
                    kind: ParsedTypeKind::Named(name),
                    span,
                })
            }
            TokenKind::Null => {
                let span = self.cursor.advance().span;
                Ok(ParsedType {
                    kind: ParsedTypeKind::Named(self.cursor.interner().intern("null")),
                    span,
                })
            }
            TokenKind::Func => ensure_sufficient_stack(|| self.parse_function_type()),
            other => Err(ParseError::new(
                ErrorCode::E1005,
                format!("expected type, found {}", describe(&other)),
                self.cursor.current_span(),
            )
            .with_context("expected type")),
        }
    }

    fn parse_function_type(&mut self) -> Result<ParsedType, ParseError> {
        let start = self.cursor.expect(&TokenKind::Func)?.span;
        self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_type()?);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.cursor.expect(&TokenKind::RParen)?.span;
        let ret = if self.cursor.eat(&TokenKind::Colon) {
            Some(Box::new(self.parse_type()?))
        } else {
            None
        };
        let end = ret.as_ref().map_or(close, |r| r.span);
        Ok(ParsedType {
            kind: ParsedTypeKind::Function { params, ret },
            span: start.merge(end),
        })
    }
}
