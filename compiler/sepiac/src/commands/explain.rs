//! The `explain` command: describe an error code.

use sepia_diagnostic::ErrorCode;

use crate::exit_code;

pub fn explain_error(code: &str) -> i32 {
    let Ok(parsed) = code.parse::<ErrorCode>() else {
        eprintln!("error: unknown error code '{code}'");
        return exit_code::USAGE;
    };
    let phase = if parsed.is_lexer_error() {
        "lexer"
    } else if parsed.is_parser_error() {
        "parser"
    } else if parsed.is_semantic_error() {
        "resolver"
    } else if parsed.is_eval_error() {
        "runtime"
    } else {
        "internal"
    };
    println!("{parsed} ({phase}): {}", parsed.description());
    exit_code::SUCCESS
}
