//! The one-shot pipeline used by `sepia run` and `sepia check`.

use pretty_assertions::assert_eq;
use sepia_diagnostic::ErrorCode;
use sepia_eval::{buffer_handler, InterpreterBuilder, Value};
use sepia_ir::{SharedInterner, Span};
use sepiac::{exit_code, Session, SessionError};

fn session() -> Session {
    Session::from_builder(
        InterpreterBuilder::new(SharedInterner::new()).print_handler(buffer_handler()),
    )
}

#[test]
fn programs_run_to_their_final_value() {
    let source = "
        func fib(n: int): int {
            if (n < 2) { return n; }
            return fib(n - 1) + fib(n - 2);
        }
        println(\"fib ${fib(10)}\");
        fib(12);
    ";
    let mut session = session();
    assert_eq!(session.run(source).ok(), Some(Value::Int(144)));
    assert_eq!(session.interpreter().print_handler().output(), "fib 55\n");
}

#[test]
fn frontend_errors_prevent_evaluation() {
    let mut session = session();
    let result = session.run("println(\"never\"); let x: int = \"text\";");
    let Err(SessionError::Frontend(diagnostics)) = result else {
        panic!("expected frontend errors");
    };
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(session.interpreter().print_handler().output(), "");
}

#[test]
fn check_collects_every_resolution_error() {
    let checked = session().check("a; b; break;");
    let codes: Vec<_> = checked.diagnostics.iter().map(|diag| diag.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2003, ErrorCode::E2003, ErrorCode::E2010]);
    assert!(checked.has_errors());
}

#[test]
fn runtime_errors_become_diagnostics() {
    let mut session = session();
    let err = session.run("let zero = 0;\n10 % zero;").err();
    let Some(err) = err else {
        panic!("expected a runtime error");
    };
    assert_eq!(err.exit_code(), exit_code::RUNTIME_ERROR);
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code, ErrorCode::E6002);
    assert_eq!(diagnostic.primary_span(), Some(Span::new(14, 23)));
}

#[test]
fn lex_errors_are_reported() {
    let checked = session().check("let s = \"unterminated;");
    assert!(checked.has_errors());
    assert!(checked.diagnostics.iter().all(|diag| diag.code.is_lexer_error()
        || diag.code.is_parser_error()));
}
