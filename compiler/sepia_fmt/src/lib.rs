//! Sepia Formatter
//!
//! Renders a parsed program back to canonical source: four-space
//! indentation, one statement per line, parentheses only where the
//! expression tree requires them (plus any the source already had).
//!
//! Formatting reads only the syntax tree; it works on unresolved programs.
//! Formatted output lexes and parses back to an equivalent tree, so it
//! evaluates to the same value as the original.
//!
//! # Modules
//!
//! - [`emitter`]: output abstraction
//! - [`formatter`]: statement and expression rendering

pub mod emitter;
pub mod formatter;

pub use emitter::{Emitter, StringEmitter};
pub use formatter::{format_expr, format_program, Formatter};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;
