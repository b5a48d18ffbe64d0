//! Tree-walking interpreter for Sepia.
//!
//! Evaluation reads the annotations the resolver left on each node: every
//! identifier carries a `(steps, index)` pair into the environment chain or
//! an index into the built-in table, so no name lookups happen at runtime.
//!
//! # Frames
//!
//! The interpreter opens frames at exactly the points the resolver opened
//! scopes, so the resolved addresses stay valid:
//!
//! - a block statement gets a frame
//! - a branch or loop body gets one frame, shared with a block body
//! - a `for` loop gets a header frame plus one body frame per iteration
//! - a call gets one frame for parameters and body, whose parent is the
//!   callee's closure
//!
//! Helper modules:
//!
//! - `exec` - statements and control flow
//! - `eval` - expressions
//! - `function_call` - calls, argument and return checks

mod builder;
mod eval;
mod exec;
mod function_call;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use exec::Flow;
pub(crate) use scope_guard::ScopedInterpreter;

use std::rc::Rc;

use sepia_ir::ast::Program;
use sepia_ir::SharedInterner;
use sepia_types::Builtins;
use tracing::debug;

use crate::diagnostics::CallStack;
use crate::print_handler::SharedPrintHandler;
use crate::{EnvSnapshot, Environment, EvalResult, Value};

/// Interpreter state. Globals persist across [`Interpreter::execute`]
/// calls, which is what the REPL relies on.
pub struct Interpreter {
    interner: SharedInterner,
    /// The root frame.
    globals: Environment,
    /// The innermost active frame.
    env: Environment,
    /// Built-in values, indexed like `builtins`.
    natives: Vec<Value>,
    builtins: Rc<Builtins>,
    call_stack: CallStack,
    print_handler: SharedPrintHandler,
}

impl Interpreter {
    /// An interpreter with the standard prelude printing to stdout.
    pub fn new(interner: SharedInterner) -> Self {
        InterpreterBuilder::new(interner).build()
    }

    /// Run a resolved program.
    ///
    /// Returns the value of the last statement when it is an expression
    /// statement, `void` otherwise. Globals declared before an error stay
    /// declared; use [`Interpreter::snapshot_globals`] to roll back.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = program.stmts.len()))]
    pub fn execute(&mut self, program: &Program) -> EvalResult {
        let result = self.execute_stmts(program);
        if result.is_err() {
            self.call_stack.clear();
            self.env = self.globals.clone();
        }
        debug!(ok = result.is_ok(), "program finished");
        result
    }

    fn execute_stmts(&mut self, program: &Program) -> EvalResult {
        let mut last = Value::Void;
        for stmt in &program.stmts {
            last = match self.exec_stmt(stmt)? {
                Flow::Normal(value) => value,
                // The resolver rejects loop controls and returns outside
                // their constructs.
                Flow::Break | Flow::Continue | Flow::Return(_) => Value::Void,
            };
        }
        Ok(last)
    }

    /// The type table matching this interpreter's built-in values. Hand it
    /// to the resolver so both agree on built-in slots.
    pub fn builtins(&self) -> Rc<Builtins> {
        Rc::clone(&self.builtins)
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn snapshot_globals(&self) -> EnvSnapshot {
        self.globals.snapshot()
    }

    pub fn restore_globals(&mut self, snapshot: EnvSnapshot) {
        self.globals.restore(snapshot);
        self.env = self.globals.clone();
    }
}
