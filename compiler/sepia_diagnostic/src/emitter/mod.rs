//! Rendering diagnostics for people.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// A destination for diagnostics. Output may be buffered until
/// [`flush`](DiagnosticEmitter::flush).
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        diagnostics.iter().for_each(|diagnostic| self.emit(diagnostic));
    }

    fn flush(&mut self);

    /// The closing `aborting due to N errors` line; nothing when both
    /// counts are zero.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}
