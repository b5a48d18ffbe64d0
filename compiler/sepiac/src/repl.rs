//! Interactive sessions whose declarations persist between submissions.
//!
//! A submission is resolved against a clone of the session's resolver. The
//! clone replaces the original only once the submission has also evaluated
//! without error; otherwise the interpreter's globals are rolled back to
//! their state before the submission, so both sides keep agreeing on slot
//! indices.

use std::borrow::Cow;

use sepia_eval::{Interpreter, InterpreterBuilder, Value};
use sepia_ir::SharedInterner;
use sepia_types::Resolver;
use tracing::debug;

use crate::session::{parse_source, SessionError};

/// The outcome of one submission, with the source as it was evaluated.
pub struct Submission {
    /// The input after statement completion; diagnostic spans point here.
    pub source: String,
    pub outcome: Result<Value, SessionError>,
}

impl Submission {
    /// The text to echo back: the final value, unless it is `void`.
    pub fn echo(&self) -> Option<String> {
        match &self.outcome {
            Ok(value) if !value.is_void() => Some(value.to_string()),
            Ok(_) | Err(_) => None,
        }
    }
}

pub struct Repl {
    interner: SharedInterner,
    resolver: Resolver,
    interpreter: Interpreter,
}

impl Repl {
    pub fn new() -> Self {
        Repl::from_builder(InterpreterBuilder::new(SharedInterner::new()))
    }

    pub fn from_builder(builder: InterpreterBuilder) -> Self {
        let interpreter = builder.build();
        let interner = interpreter.interner().clone();
        let resolver = Resolver::new(interpreter.builtins());
        Repl {
            interner,
            resolver,
            interpreter,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Evaluate one line of input. Errors leave the session as it was.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn submit(&mut self, line: &str) -> Submission {
        let source = complete_statement(line).into_owned();
        let outcome = self.evaluate(&source);
        Submission { source, outcome }
    }

    fn evaluate(&mut self, source: &str) -> Result<Value, SessionError> {
        let checked = parse_source(source, &self.interner);
        if checked.has_errors() {
            return Err(SessionError::Frontend(checked.diagnostics));
        }

        let mut resolver = self.resolver.clone();
        let errors = resolver.resolve(&checked.program, &self.interner);
        if !errors.is_empty() {
            debug!(errors = errors.len(), "discarding resolver state");
            return Err(SessionError::Frontend(
                errors
                    .into_iter()
                    .map(sepia_types::SemanticError::into_diagnostic)
                    .collect(),
            ));
        }

        let snapshot = self.interpreter.snapshot_globals();
        match self.interpreter.execute(&checked.program) {
            Ok(value) => {
                self.resolver = resolver;
                Ok(value)
            }
            Err(err) => {
                debug!(error = %err, "rolling back globals");
                self.interpreter.restore_globals(snapshot);
                Err(SessionError::Runtime(err.into_diagnostic()))
            }
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Repl::new()
    }
}

/// Add the `;` a single statement typed at the prompt usually leaves off.
fn complete_statement(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim_end();
    if trimmed.is_empty() || trimmed.ends_with(';') || trimmed.ends_with('}') {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{trimmed};"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn statements_are_completed() {
        assert_eq!(complete_statement("1 + 2"), "1 + 2;");
        assert_eq!(complete_statement("let x = 1;  "), "let x = 1;");
        assert_eq!(complete_statement("func f() {}"), "func f() {}");
        assert_eq!(complete_statement("   "), "");
    }
}
