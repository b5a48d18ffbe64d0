//! Shared pipeline for the evaluator's integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use sepia_eval::{buffer_handler, EvalResult, Interpreter, InterpreterBuilder};
use sepia_ir::ast::Program;
use sepia_ir::{SharedInterner, StringInterner};
use sepia_types::Resolver;

pub fn parse(source: &str, interner: &StringInterner) -> Program {
    let lexed = sepia_lexer::lex(source, interner);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let parsed = sepia_parse::parse(&lexed.tokens, interner);
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    parsed.program
}

/// A program's result plus everything it printed.
pub struct Run {
    pub result: EvalResult,
    pub output: String,
}

pub fn run(source: &str) -> Run {
    run_with(source, |builder| builder)
}

pub fn run_with(
    source: &str,
    configure: impl FnOnce(InterpreterBuilder) -> InterpreterBuilder,
) -> Run {
    let interner = SharedInterner::new();
    let mut interp =
        configure(InterpreterBuilder::new(interner.clone()).print_handler(buffer_handler()))
            .build();
    let program = parse(source, &interner);
    let errors = Resolver::new(interp.builtins()).resolve(&program, &interner);
    assert!(errors.is_empty(), "semantic errors: {errors:?}");
    let result = interp.execute(&program);
    Run {
        result,
        output: interp.print_handler().output(),
    }
}

/// An interpreter and resolver that persist across submissions, the way
/// the REPL drives them.
pub struct Session {
    pub interner: SharedInterner,
    pub interp: Interpreter,
    pub resolver: Resolver,
}

impl Session {
    pub fn new() -> Self {
        let interner = SharedInterner::new();
        let interp = InterpreterBuilder::new(interner.clone())
            .print_handler(buffer_handler())
            .build();
        let resolver = Resolver::new(interp.builtins());
        Session {
            interner,
            interp,
            resolver,
        }
    }

    /// Resolve and run one submission. Semantic errors panic.
    pub fn submit(&mut self, source: &str) -> EvalResult {
        let program = parse(source, &self.interner);
        let errors = self.resolver.resolve(&program, &self.interner);
        assert!(errors.is_empty(), "semantic errors: {errors:?}");
        self.interp.execute(&program)
    }
}
