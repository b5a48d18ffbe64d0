//! Parse error types.

use sepia_diagnostic::{Diagnostic, ErrorCode};
use sepia_ir::{Span, TokenKind};
use sepia_lexer::LexError;

/// A syntax error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Label text at the primary span.
    pub context: Option<String>,
    /// Secondary location, e.g. where an unclosed `{` was opened.
    pub related: Option<(Span, String)>,
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            related: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related = Some((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    #[cold]
    pub fn expected_expression(found: TokenKind, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1002,
            format!("expected expression, found {}", crate::cursor::describe(&found)),
            span,
        )
        .with_context("expected expression")
    }

    #[cold]
    pub fn unclosed(open: Span, delimiter: char, at: Span) -> Self {
        ParseError::new(ErrorCode::E1003, format!("unclosed delimiter `{delimiter}`"), at)
            .with_context("reached end of input")
            .with_related(open, "opened here")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));
        if let Some((span, message)) = &self.related {
            diag = diag.with_secondary_label(*span, message);
        }
        for help in &self.help {
            diag = diag.with_suggestion(help);
        }
        diag
    }
}

/// Lexical errors found while re-lexing `${...}` segments are reported
/// through the parser.
impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let span = err.span;
        let diag = err.into_diagnostic();
        ParseError::new(diag.code, diag.message, span)
    }
}
