//! Command handlers for the `sepia` CLI.
//!
//! Each submodule implements one subcommand and returns the process exit
//! code. Shared helpers (`read_file`, diagnostic reporting) live here.

use std::io::IsTerminal;

use sepia_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use sepia_diagnostic::{count_by_severity, Diagnostic};
use sepia_eval::DEFAULT_MAX_CALL_DEPTH;

use crate::exit_code;

mod check;
mod debug;
mod explain;
mod fmt;
mod repl;
mod run;

pub use check::check_file;
pub use debug::{lex_file, parse_file, program_outline, token_listing};
pub use explain::explain_error;
pub use fmt::{format_file, FormatMode};
pub use repl::run_repl;
pub use run::run_file;

/// Settings shared by every command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub color: ColorMode,
    /// Call-depth limit for `run` and `repl`; `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            color: ColorMode::Auto,
            max_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}

/// Separate the global `--color=` and `--max-depth=` flags from the rest of
/// the command line. Other arguments keep their order.
pub fn split_options(args: &[String]) -> Result<(Options, Vec<String>), String> {
    let mut options = Options::default();
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        if let Some(mode) = arg.strip_prefix("--color=") {
            options.color = mode.parse()?;
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            options.max_depth = parse_depth(depth)?;
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((options, rest))
}

fn parse_depth(depth: &str) -> Result<Option<usize>, String> {
    if depth == "unlimited" {
        return Ok(None);
    }
    match depth.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!(
            "invalid depth `{depth}` (expected a positive number or `unlimited`)"
        )),
        Ok(n) => Ok(Some(n)),
    }
}

/// Read a source file, reporting failures on stderr.
pub(super) fn read_file(path: &str) -> Result<String, i32> {
    std::fs::read_to_string(path).map_err(|e| {
        let msg = match e.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {e}"),
        };
        eprintln!("error: {msg}");
        exit_code::USAGE
    })
}

/// A stderr emitter that renders snippets from `source`.
pub(super) fn stderr_emitter(
    color: ColorMode,
    path: &str,
    source: &str,
) -> TerminalEmitter<std::io::Stderr> {
    let is_tty = std::io::stderr().is_terminal();
    TerminalEmitter::with_color_mode(std::io::stderr(), color, is_tty).with_source(path, source)
}

/// Emit every diagnostic followed by the error/warning summary.
pub(super) fn report(emitter: &mut impl DiagnosticEmitter, diagnostics: &[Diagnostic]) {
    emitter.emit_all(diagnostics);
    let (errors, warnings) = count_by_severity(diagnostics);
    emitter.emit_summary(errors, warnings);
    emitter.flush();
}
