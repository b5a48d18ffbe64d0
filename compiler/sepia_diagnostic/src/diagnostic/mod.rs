//! The [`Diagnostic`] type every phase reports through.
//!
//! Lexer, parser, resolver and evaluator each keep their own error type and
//! convert it here at the boundary to the driver.

use std::fmt;

use sepia_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    /// Stops the program from running.
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a label marks the fault itself or context around it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LabelStyle {
    Primary,
    Secondary,
}

/// A message attached to a span of the source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn new(style: LabelStyle, span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            style,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }
}

/// A reportable problem: code, headline, labelled spans, and trailing
/// `note`/`help` lines.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// In source order of attachment; the first primary label is the
    /// headline location.
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    /// Rendered as `help:` lines.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic::with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic::with_severity(code, Severity::Warning)
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..self
        }
    }

    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.push_label(Label::new(LabelStyle::Primary, span, message))
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.push_label(Label::new(LabelStyle::Secondary, span, message))
    }

    fn push_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(|label| label.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Plain single-block rendering, without source snippets. The terminal
/// emitter is the rich form.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let at = match label.style {
                LabelStyle::Primary => "at",
                LabelStyle::Secondary => "  ",
            };
            write!(f, "\n  {at} {}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
