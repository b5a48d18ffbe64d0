//! The `fmt` command: pretty-print a source file.

use sepia_ir::SharedInterner;

use crate::exit_code;
use crate::session::parse_source;

use super::{read_file, report, stderr_emitter, Options};

/// What to do with the formatted text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatMode {
    /// Write it to stdout.
    #[default]
    Print,
    /// Only report whether the file is already formatted.
    Check,
    /// Replace the file's contents.
    Write,
}

/// Format `path`. Files that do not parse are left untouched.
pub fn format_file(path: &str, mode: FormatMode, options: Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let interner = SharedInterner::new();
    let checked = parse_source(&source, &interner);
    if checked.has_errors() {
        report(&mut stderr_emitter(options.color, path, &source), &checked.diagnostics);
        return exit_code::FRONTEND_ERROR;
    }

    let formatted = sepia_fmt::format_program(&checked.program.stmts, &interner);
    match mode {
        FormatMode::Print => {
            print!("{formatted}");
            exit_code::SUCCESS
        }
        FormatMode::Check if formatted == source => exit_code::SUCCESS,
        FormatMode::Check => {
            eprintln!("'{path}' is not formatted");
            exit_code::FRONTEND_ERROR
        }
        FormatMode::Write => {
            if formatted == source {
                return exit_code::SUCCESS;
            }
            match std::fs::write(path, formatted) {
                Ok(()) => exit_code::SUCCESS,
                Err(e) => {
                    eprintln!("error: cannot write '{path}': {e}");
                    exit_code::USAGE
                }
            }
        }
    }
}
