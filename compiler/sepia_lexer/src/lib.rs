//! Lexer for Sepia using logos with string interning.
//!
//! [`lex`] turns source text into a [`TokenList`] terminated by an `Eof`
//! token. Lexical errors do not stop scanning: the offending input becomes
//! a [`TokenKind::Error`] token and a [`LexError`] is recorded, so the parser
//! can still report syntax errors in the rest of the file.

mod template;

use logos::Logos;
use sepia_diagnostic::{Diagnostic, ErrorCode};
use sepia_ir::{Span, StringInterner, TemplatePart, Token, TokenKind, TokenList};
use tracing::debug;

pub use template::escape_text;

/// What went wrong while scanning.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid character in source")]
    InvalidCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated interpolation segment")]
    UnterminatedInterpolation,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("integer literal does not fit in 64 bits")]
    IntegerTooLarge,
    #[error("invalid float literal")]
    InvalidFloat,
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),
}

/// A lexical error with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let code = match self.kind {
            LexErrorKind::InvalidCharacter => ErrorCode::E0002,
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::UnterminatedInterpolation => ErrorCode::E0005,
            LexErrorKind::UnterminatedComment => ErrorCode::E0006,
            LexErrorKind::IntegerTooLarge | LexErrorKind::InvalidFloat => ErrorCode::E0003,
            LexErrorKind::InvalidEscape(_) => ErrorCode::E0004,
        };
        let diag = Diagnostic::error(code)
            .with_message(self.kind.to_string())
            .with_label(self.span, "here");
        match self.kind {
            LexErrorKind::InvalidEscape(_) => diag.with_note(
                "supported escapes are \\n \\t \\r \\0 \\\\ \\\" and \\$",
            ),
            LexErrorKind::UnterminatedInterpolation => {
                diag.with_suggestion("close the segment with `}`")
            }
            _ => diag,
        }
    }
}

/// Tokens plus any lexical errors.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // === Keywords ===
    #[token("let")]
    Let,
    #[token("func")]
    Func,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("class")]
    Class,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    // === Literals ===
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*", |lex| parse_radix(&lex.slice()[2..], 16))]
    HexInt(i64),

    #[regex(r"0b[01][01_]*", |lex| parse_radix(&lex.slice()[2..], 2))]
    BinInt(i64),

    #[regex(r"[0-9][0-9_]*", |lex| parse_radix(lex.slice(), 10))]
    Int(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| parse_float(lex.slice()))]
    Float(f64),

    #[token("\"", string_literal)]
    String,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

fn parse_radix(digits: &str, radix: u32) -> Result<i64, LexErrorKind> {
    i64::from_str_radix(&digits.replace('_', ""), radix).map_err(|_| LexErrorKind::IntegerTooLarge)
}

fn parse_float(text: &str) -> Result<f64, LexErrorKind> {
    text.replace('_', "")
        .parse::<f64>()
        .map_err(|_| LexErrorKind::InvalidFloat)
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    if let Some(end) = rest.find("*/") {
        lex.bump(end + 2);
        Ok(())
    } else {
        lex.bump(rest.len());
        Err(LexErrorKind::UnterminatedComment)
    }
}

fn string_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match template::scan_string(rest.as_bytes()) {
        Ok(len) => {
            lex.bump(len);
            Ok(())
        }
        Err(kind) => {
            lex.bump(rest.len());
            Err(kind)
        }
    }
}

/// Lex a complete source file.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    lex_at(source, 0, interner)
}

/// Lex `source` as if it started at byte `base` of the enclosing file.
///
/// The parser uses this to re-lex interpolation segments so that their
/// spans point into the original literal.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len(), base))]
pub fn lex_at(source: &str, base: u32, interner: &StringInterner) -> LexOutput {
    let mut out = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span()).offset_by(base);
        let slice = logos.slice();

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(RawToken::String) => {
                let kind = string_token(slice, span, interner, &mut out);
                out.tokens.push(Token::new(kind, span));
            }
            Ok(raw) => {
                let kind = convert_token(raw, slice, interner);
                out.tokens.push(Token::new(kind, span));
            }
            Err(kind) => {
                out.errors.push(LexError::new(kind, span));
                out.tokens.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    out.tokens
        .push(Token::new(TokenKind::Eof, Span::point(end).offset_by(base)));

    debug!(
        tokens = out.tokens.len(),
        errors = out.errors.len(),
        "lexed source"
    );
    out
}

/// Process a complete string literal, quotes included.
fn string_token(
    slice: &str,
    span: Span,
    interner: &StringInterner,
    out: &mut LexOutput,
) -> TokenKind {
    let body = slice
        .get(1..slice.len().saturating_sub(1))
        .unwrap_or_default();
    let (mut parts, errors) = template::split_template(body, span.start + 1);
    out.errors.extend(errors);

    let is_plain = parts
        .iter()
        .all(|part| matches!(part, TemplatePart::Text(_)));
    if is_plain {
        let text = match parts.pop() {
            Some(TemplatePart::Text(text)) => text,
            _ => String::new(),
        };
        TokenKind::String(interner.intern(&text))
    } else {
        TokenKind::Template(out.tokens.push_template(parts))
    }
}

/// Convert a raw token to a `TokenKind`, interning identifiers.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Int(n) | RawToken::HexInt(n) | RawToken::BinInt(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Let => TokenKind::Let,
        RawToken::Func => TokenKind::Func,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::For => TokenKind::For,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Class => TokenKind::Class,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Colon => TokenKind::Colon,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,

        // Handled by `lex_at` before conversion.
        RawToken::LineComment | RawToken::BlockComment | RawToken::String => TokenKind::Error,
    }
}
