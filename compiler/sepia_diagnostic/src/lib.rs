//! Diagnostic system for rich error reporting.
//!
//! Each diagnostic carries:
//! - an error code for searchability
//! - a message saying what went wrong
//! - a primary span saying where
//! - optional secondary labels, notes and suggestions

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use error_code::ErrorCode;

/// Count errors and warnings, in that order.
pub fn count_by_severity(diagnostics: &[Diagnostic]) -> (usize, usize) {
    diagnostics
        .iter()
        .fold((0, 0), |(errors, warnings), d| match d.severity {
            Severity::Error => (errors + 1, warnings),
            Severity::Warning => (errors, warnings + 1),
        })
}
