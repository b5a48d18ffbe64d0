//! The one-shot pipeline: lex, parse, resolve, evaluate.

use sepia_diagnostic::Diagnostic;
use sepia_eval::{EnvSnapshot, Interpreter, InterpreterBuilder, Value};
use sepia_ir::ast::Program;
use sepia_ir::{SharedInterner, StringInterner};
use sepia_types::Resolver;
use thiserror::Error;
use tracing::debug;

/// Process exit codes used by the `sepia` binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// Lex, parse or resolution errors; nothing was evaluated.
    pub const FRONTEND_ERROR: i32 = 1;
    pub const RUNTIME_ERROR: i32 = 2;
    /// Bad command line (sysexits `EX_USAGE`).
    pub const USAGE: i32 = 64;
}

/// Why a session did not produce a value.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("found {} error(s) before evaluation", .0.len())]
    Frontend(Vec<Diagnostic>),
    #[error("{0}")]
    Runtime(Diagnostic),
}

impl SessionError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SessionError::Frontend(diagnostics) => diagnostics,
            SessionError::Runtime(diagnostic) => std::slice::from_ref(diagnostic),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::Frontend(_) => exit_code::FRONTEND_ERROR,
            SessionError::Runtime(_) => exit_code::RUNTIME_ERROR,
        }
    }
}

/// A parsed program and every diagnostic the frontend raised for it.
pub struct Checked {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Checked {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Lex and parse `source`. Lex errors and parse errors are both collected;
/// the program holds whatever the parser recovered.
pub(crate) fn parse_source(source: &str, interner: &StringInterner) -> Checked {
    let lexed = sepia_lexer::lex(source, interner);
    let mut diagnostics: Vec<Diagnostic> = lexed
        .errors
        .into_iter()
        .map(sepia_lexer::LexError::into_diagnostic)
        .collect();
    let parsed = sepia_parse::parse(&lexed.tokens, interner);
    diagnostics.extend(parsed.errors.iter().map(sepia_parse::ParseError::to_diagnostic));
    Checked {
        program: parsed.program,
        diagnostics,
    }
}

/// Runs whole programs against one interpreter.
///
/// Every [`run`](Session::run) starts from empty globals, so programs do not
/// see each other's variables. The [`Repl`](crate::Repl) keeps them instead.
pub struct Session {
    interner: SharedInterner,
    interpreter: Interpreter,
    pristine: EnvSnapshot,
}

impl Session {
    /// A session with the default interpreter configuration.
    pub fn new() -> Self {
        Session::from_builder(InterpreterBuilder::new(SharedInterner::new()))
    }

    pub fn from_builder(builder: InterpreterBuilder) -> Self {
        let interpreter = builder.build();
        let interner = interpreter.interner().clone();
        let pristine = interpreter.snapshot_globals();
        Session {
            interner,
            interpreter,
            pristine,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Lex, parse and resolve. Resolution is skipped when the source does
    /// not parse cleanly, since a recovered tree only produces follow-on
    /// errors.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check(&self, source: &str) -> Checked {
        let mut checked = parse_source(source, &self.interner);
        if checked.has_errors() {
            debug!(errors = checked.diagnostics.len(), "skipping resolution");
            return checked;
        }
        let errors =
            Resolver::new(self.interpreter.builtins()).resolve(&checked.program, &self.interner);
        checked
            .diagnostics
            .extend(errors.into_iter().map(sepia_types::SemanticError::into_diagnostic));
        checked
    }

    /// Check `source` and, when it is free of errors, evaluate it.
    ///
    /// Returns the value of the final statement.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, source: &str) -> Result<Value, SessionError> {
        let checked = self.check(source);
        if checked.has_errors() {
            return Err(SessionError::Frontend(checked.diagnostics));
        }
        self.interpreter.restore_globals(self.pristine.clone());
        self.interpreter
            .execute(&checked.program)
            .map_err(|err| SessionError::Runtime(err.into_diagnostic()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
