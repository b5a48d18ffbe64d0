//! Error recovery for the parser.
//!
//! Token sets use a bitset over `TokenKind::discriminant_index` for O(1)
//! membership testing.

use sepia_ir::TokenKind;

use crate::cursor::Cursor;

/// A set of token kinds.
///
/// Each bit in the u64 corresponds to a `TokenKind` discriminant index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)] // const fn builder for static initialization
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u64 << kind.discriminant_index()))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(&self, kind: &TokenKind) -> bool {
        (self.0 & (1u64 << kind.discriminant_index())) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Tokens that can only begin a statement.
pub const STMT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Let)
    .with(TokenKind::If)
    .with(TokenKind::While)
    .with(TokenKind::For)
    .with(TokenKind::Return)
    .with(TokenKind::Break)
    .with(TokenKind::Continue)
    .with(TokenKind::Class);

/// Where statement-level recovery stops without consuming.
pub const STMT_BOUNDARY: TokenSet = STMT_START
    .with(TokenKind::Func)
    .with(TokenKind::LBrace)
    .with(TokenKind::RBrace)
    .with(TokenKind::Eof);

/// Skip tokens after a failed statement.
///
/// Stops after a `;` or before a token in `recovery`. At least one token is
/// consumed when `start` is the current position, so the caller always makes
/// progress.
pub fn synchronize(cursor: &mut Cursor<'_>, start: usize, recovery: TokenSet) {
    if cursor.position() == start && !cursor.is_at_end() {
        cursor.advance();
    }
    while !cursor.is_at_end() {
        if cursor.check(&TokenKind::Semicolon) {
            cursor.advance();
            return;
        }
        if recovery.contains(&cursor.current_kind()) {
            return;
        }
        cursor.advance();
    }
}
