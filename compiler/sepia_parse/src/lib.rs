//! Recursive descent parser for Sepia.
//!
//! Produces an owned [`Program`] tree. Syntax errors are collected rather
//! than returned: after a failed statement the parser resynchronizes at the
//! next statement boundary, so one run reports every independent mistake.

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use error::ParseError;
pub use recovery::{synchronize, TokenSet};

use sepia_ir::ast::Program;
use sepia_ir::{StringInterner, TokenList};
use tracing::debug;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    errors: Vec<ParseError>,
}

/// Result of parsing: the program plus any syntax errors.
///
/// The program is still usable when errors were found; failed statements
/// are simply absent from it.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            errors: Vec::new(),
        }
    }

    /// Parse the whole token stream as a program.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(mut self) -> ParseOutput {
        let mut stmts = Vec::new();
        while !self.cursor.is_at_end() {
            if let Some(stmt) = self.parse_stmt_recovering() {
                stmts.push(stmt);
            }
        }
        debug!(
            statements = stmts.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        ParseOutput {
            program: Program::new(stmts),
            errors: self.errors,
        }
    }
}

/// Parse a token stream.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    Parser::new(tokens, interner).parse_program()
}
