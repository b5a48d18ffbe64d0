//! Tokens produced by the lexer and consumed by the parser.

use std::fmt;

use crate::{Name, Span};

/// Kind of a token, including the literal payload if any.
///
/// Kept `Copy`: string templates live in a side table on [`TokenList`]
/// and are referenced by index.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TokenKind {
    // Literals
    Int(i64),
    /// IEEE bits, so the kind stays `Eq`-friendly.
    Float(u64),
    String(Name),
    /// String containing `${...}` segments; index into [`TokenList::templates`].
    Template(u32),
    Ident(Name),

    // Keywords
    Let,
    Func,
    Return,
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    Class,
    True,
    False,
    Null,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    Bang,
    AmpAmp,
    PipePipe,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    /// Unrecognised input; the lexer has already reported it.
    Error,
    Eof,
}

impl TokenKind {
    /// Dense index of the variant, used by parser token sets.
    pub const fn discriminant_index(&self) -> u8 {
        match self {
            TokenKind::Int(_) => 0,
            TokenKind::Float(_) => 1,
            TokenKind::String(_) => 2,
            TokenKind::Template(_) => 3,
            TokenKind::Ident(_) => 4,
            TokenKind::Let => 5,
            TokenKind::Func => 6,
            TokenKind::Return => 7,
            TokenKind::If => 8,
            TokenKind::Else => 9,
            TokenKind::While => 10,
            TokenKind::For => 11,
            TokenKind::Break => 12,
            TokenKind::Continue => 13,
            TokenKind::Class => 14,
            TokenKind::True => 15,
            TokenKind::False => 16,
            TokenKind::Null => 17,
            TokenKind::LParen => 18,
            TokenKind::RParen => 19,
            TokenKind::LBrace => 20,
            TokenKind::RBrace => 21,
            TokenKind::Comma => 22,
            TokenKind::Semicolon => 23,
            TokenKind::Colon => 24,
            TokenKind::Plus => 25,
            TokenKind::Minus => 26,
            TokenKind::Star => 27,
            TokenKind::Slash => 28,
            TokenKind::Percent => 29,
            TokenKind::Amp => 30,
            TokenKind::Pipe => 31,
            TokenKind::Caret => 32,
            TokenKind::Tilde => 33,
            TokenKind::Shl => 34,
            TokenKind::Shr => 35,
            TokenKind::Bang => 36,
            TokenKind::AmpAmp => 37,
            TokenKind::PipePipe => 38,
            TokenKind::EqEq => 39,
            TokenKind::NotEq => 40,
            TokenKind::Lt => 41,
            TokenKind::LtEq => 42,
            TokenKind::Gt => 43,
            TokenKind::GtEq => 44,
            TokenKind::Eq => 45,
            TokenKind::PlusEq => 46,
            TokenKind::MinusEq => 47,
            TokenKind::StarEq => 48,
            TokenKind::SlashEq => 49,
            TokenKind::PercentEq => 50,
            TokenKind::AmpEq => 51,
            TokenKind::PipeEq => 52,
            TokenKind::CaretEq => 53,
            TokenKind::ShlEq => 54,
            TokenKind::ShrEq => 55,
            TokenKind::Error => 56,
            TokenKind::Eof => 57,
        }
    }

    /// Human-readable name for "expected X, found Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::String(_) | TokenKind::Template(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Let => "let",
            TokenKind::Func => "func",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Class => "class",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Bang => "!",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

/// One lexed token.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// A piece of an interpolated string literal.
#[derive(Clone, PartialEq, Debug)]
pub enum TemplatePart {
    /// Literal text with escapes already processed.
    Text(String),
    /// Raw source of a `${...}` segment, to be re-lexed by the parser.
    ///
    /// `offset` is the absolute byte offset of `source` in the file.
    Code { source: String, offset: u32 },
}

/// Lexer output: the token stream plus interpolation templates.
#[derive(Clone, Default, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
    templates: Vec<Vec<TemplatePart>>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Store a template and return the index for [`TokenKind::Template`].
    pub fn push_template(&mut self, parts: Vec<TemplatePart>) -> u32 {
        let index = u32::try_from(self.templates.len()).unwrap_or(u32::MAX);
        self.templates.push(parts);
        index
    }

    pub fn template(&self, index: u32) -> &[TemplatePart] {
        self.templates
            .get(index as usize)
            .map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_fit_in_a_u64_set() {
        assert!(TokenKind::Eof.discriminant_index() < 64);
        assert_eq!(
            TokenKind::Int(1).discriminant_index(),
            TokenKind::Int(99).discriminant_index()
        );
    }

    #[test]
    fn templates_are_indexed() {
        let mut list = TokenList::new();
        let idx = list.push_template(vec![TemplatePart::Text("hi ".into())]);
        list.push(Token::new(TokenKind::Template(idx), Span::new(0, 5)));
        assert_eq!(list.template(idx).len(), 1);
        assert!(list.template(idx + 1).is_empty());
    }
}
