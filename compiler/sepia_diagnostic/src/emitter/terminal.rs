//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//! When given the source text, labels are rendered as `path:line:col`
//! followed by the offending line and a caret underline.

use std::io::Write;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label, LabelStyle, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// The closing line after a batch of diagnostics, if anything was reported.
fn summary_line(errors: usize, warnings: usize) -> Option<(Severity, String)> {
    let count = |n: usize, what: &str| {
        if n == 1 {
            format!("1 {what}")
        } else {
            format!("{n} {what}s")
        }
    };
    match (errors, warnings) {
        (0, 0) => None,
        (0, w) => Some((Severity::Warning, format!("{} emitted", count(w, "warning")))),
        (e, 0) => Some((Severity::Error, format!("aborting due to {}", count(e, "error")))),
        (e, w) => Some((
            Severity::Error,
            format!(
                "aborting due to {}; {} emitted",
                count(e, "error"),
                count(w, "warning")
            ),
        )),
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "invalid color mode `{other}` (expected auto, always or never)"
            )),
        }
    }
}

struct SourceContext {
    path: String,
    source: String,
    lines: LineOffsetTable,
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceContext>,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
        }
    }

    /// Resolve spans against `source`, printing `path:line:col` and a snippet.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = Some(SourceContext {
            path: path.into(),
            lines: LineOffsetTable::build(&source),
            source,
        });
        self
    }

    /// `= note: ...` and `= help: ...` lines under a diagnostic.
    fn write_trailer(&mut self, kind: &str, color: &str, text: &str) {
        let _ = write!(self.writer, "  = ");
        self.write_colored(kind, color);
        let _ = writeln!(self.writer, ": {text}");
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
        };
        self.write_colored(severity.as_str(), color);
    }

    fn write_code(&mut self, code: &str) {
        self.write_colored(&format!("[{code}]"), colors::BOLD);
    }

    fn write_label(&mut self, label: &Label) {
        let (marker, color, underline) = match label.style {
            LabelStyle::Primary => ("-->", colors::ERROR, "^"),
            LabelStyle::Secondary => ("   ", colors::SECONDARY, "-"),
        };

        if self.source.is_none() {
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
            return;
        }
        let Some(ctx) = &self.source else {
            return;
        };

        let (line, col) = ctx.lines.offset_to_line_col(&ctx.source, label.span.start);
        let text = ctx.lines.line_text(&ctx.source, line).to_owned();
        let location = format!("{}:{line}:{col}", ctx.path);
        let gutter = " ".repeat(line.to_string().len());

        // Underline at least one column, and never past the end of the line.
        let line_chars = text.chars().count();
        let start_col = (col as usize).saturating_sub(1);
        let span_chars = ctx
            .source
            .get(label.span.to_range())
            .map_or(1, |s| s.lines().next().unwrap_or("").chars().count())
            .max(1);
        let width = span_chars.min(line_chars.saturating_sub(start_col).max(1));
        let carets = underline.repeat(width);

        let _ = writeln!(self.writer, "  {marker} {location}");
        let _ = writeln!(self.writer, "{gutter} |");
        let _ = writeln!(self.writer, "{line} | {text}");
        let _ = write!(self.writer, "{gutter} | {}", " ".repeat(start_col));
        self.write_colored(&carets, color);
        let _ = write!(self.writer, " ");
        self.write_colored(&label.message, color);
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_severity(diagnostic.severity);
        self.write_code(diagnostic.code.as_str());
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(label);
        }
        for note in &diagnostic.notes {
            self.write_trailer("note", colors::BOLD, note);
        }
        for suggestion in &diagnostic.suggestions {
            self.write_trailer("help", colors::HELP, suggestion);
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if let Some((severity, text)) = summary_line(error_count, warning_count) {
            self.write_severity(severity);
            let _ = writeln!(self.writer, ": {text}");
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use sepia_ir::Span;

    fn sample_diagnostic() -> Diagnostic {
        Diagnostic::error(ErrorCode::E2001)
            .with_message("type mismatch: expected `int`, found `string`")
            .with_label(Span::new(13, 18), "initializer")
            .with_secondary_label(Span::new(4, 5), "declared here")
            .with_note("every slot keeps its declared type")
            .with_suggestion("use `parseInt` to convert")
    }

    fn render(mode: ColorMode, source: Option<&str>, diag: &Diagnostic) -> String {
        let mut output = Vec::new();
        {
            let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
            if let Some(src) = source {
                emitter = emitter.with_source("main.sp", src);
            }
            emitter.emit(diag);
            emitter.flush();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_terminal_emitter_no_color() {
        let text = render(ColorMode::Never, None, &sample_diagnostic());
        assert!(text.contains("error[E2001]: type mismatch"));
        assert!(text.contains("--> 13..18: initializer"));
        assert!(text.contains("note: every slot"));
        assert!(text.contains("help: use `parseInt`"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_terminal_emitter_with_color() {
        let text = render(ColorMode::Always, None, &sample_diagnostic());
        assert!(text.contains("\x1b["));
        assert!(text.contains("E2001"));
    }

    #[test]
    fn test_source_snippet_and_carets() {
        let source = "let x: int = \"abc\";";
        let text = render(ColorMode::Never, Some(source), &sample_diagnostic());
        assert!(text.contains("--> main.sp:1:14"), "{text}");
        assert!(text.contains("1 | let x: int = \"abc\";"), "{text}");
        assert!(text.contains("^^^^^ initializer"), "{text}");
        assert!(text.contains("- declared here"), "{text}");
    }

    #[test]
    fn test_emit_summary() {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        emitter.emit_summary(2, 1);
        emitter.emit_summary(1, 0);
        emitter.emit_summary(0, 3);
        emitter.emit_summary(0, 0);
        emitter.flush();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: aborting due to 2 errors; 1 warning emitted"));
        assert!(text.contains("error: aborting due to 1 error\n"));
        assert!(text.contains("warning: 3 warnings emitted"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_color_mode_parsing() {
        assert_eq!("never".parse::<ColorMode>(), Ok(ColorMode::Never));
        assert!("sometimes".parse::<ColorMode>().is_err());
        assert_eq!(ColorMode::default(), ColorMode::Auto);
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
    }
}
