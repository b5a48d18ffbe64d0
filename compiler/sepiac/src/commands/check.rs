//! The `check` command: lex, parse and resolve without evaluating.

use crate::{exit_code, Session};

use super::{read_file, report, stderr_emitter, Options};

pub fn check_file(path: &str, options: Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let checked = Session::new().check(&source);
    if checked.diagnostics.is_empty() {
        return exit_code::SUCCESS;
    }

    let mut emitter = stderr_emitter(options.color, path, &source);
    report(&mut emitter, &checked.diagnostics);
    if checked.has_errors() {
        exit_code::FRONTEND_ERROR
    } else {
        exit_code::SUCCESS
    }
}
