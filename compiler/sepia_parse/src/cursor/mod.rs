//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use sepia_diagnostic::ErrorCode;
use sepia_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};
use tracing::trace;

use crate::ParseError;

/// Cursor over a [`TokenList`].
///
/// Invariant: the list ends with `Eof` and the position never moves past it.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

static EOF: Token = Token::new(TokenKind::Eof, Span::DUMMY);

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// The token list, for template side-table lookups.
    pub fn tokens(&self) -> &'a TokenList {
        self.tokens
    }

    /// Used for progress tracking during recovery.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The current token; a synthetic `Eof` if the list is empty.
    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    #[inline]
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|prev| self.tokens.get(prev))
            .map_or(Span::DUMMY, |t| t.span)
    }

    /// `peek_kind_at(0)` is the current token.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Compare kinds only, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind().discriminant_index() == kind.discriminant_index()
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Advance and return the consumed token. Never moves past `Eof`.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        trace!(
            pos = self.pos,
            kind = %token.kind.display_name(),
            span_start = token.span.start,
            span_end = token.span.end,
            "advance"
        );
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect the current token to be of the given kind, advance and return it.
    #[inline]
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: &TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {}, found {}",
                describe(kind),
                describe(&self.current_kind())
            ),
            self.current_span(),
        )
        .with_context(format!("expected {}", describe(kind)))
    }

    /// Expect and consume an identifier, returning its name and span.
    #[inline]
    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok((name, span))
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "expected identifier, found {}",
                describe(&self.current_kind())
            ),
            self.current_span(),
        )
    }
}

/// Token description for messages: punctuation and keywords are quoted.
pub(crate) fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::String(_)
        | TokenKind::Template(_)
        | TokenKind::Ident(_)
        | TokenKind::Error
        | TokenKind::Eof => kind.display_name().to_owned(),
        _ => format!("`{}`", kind.display_name()),
    }
}

#[cfg(test)]
mod tests;
