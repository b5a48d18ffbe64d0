//! Sepia Eval - tree-walking evaluator for resolved Sepia programs.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Environment`: a chain of shared frames addressed by resolved
//!   `(steps, index)` pairs
//! - `evaluate_binary` / `evaluate_unary`: enum-based operator dispatch
//! - `Callable`: user closures and natives behind one call path
//! - `CallStack`: recursion limit and backtraces for runtime errors
//!
//! Programs must be resolved by `sepia_types` first, with the interpreter's
//! own [`Interpreter::builtins`] table, so both agree on every slot.

mod diagnostics;
mod environment;
pub mod errors;
mod interpreter;
mod natives;
mod operators;
mod print_handler;
mod unary_operators;
mod value;

pub use diagnostics::{CallFrame, CallStack, DEFAULT_MAX_CALL_DEPTH};
pub use environment::{EnvError, EnvSnapshot, Environment, LocalScope, Slot};
pub use errors::{
    ArgumentMismatch, BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{Flow, Interpreter, InterpreterBuilder};
pub use operators::{evaluate_binary, values_equal};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use unary_operators::evaluate_unary;
pub use value::{Callable, FunctionValue, NativeFn, NativeFunction, Value};

#[cfg(test)]
mod tests;
