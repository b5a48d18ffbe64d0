//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::rc::Rc;

use sepia_ir::{SharedInterner, Type};
use sepia_types::Builtins;
use tracing::debug;

use super::Interpreter;
use crate::diagnostics::{CallStack, DEFAULT_MAX_CALL_DEPTH};
use crate::natives::prelude;
use crate::{stdout_handler, Callable, Environment, NativeFunction, SharedPrintHandler, Value};

/// Builder for [`Interpreter`].
///
/// Defaults: stdout printing, the standard prelude, and a call-depth limit
/// of [`DEFAULT_MAX_CALL_DEPTH`].
pub struct InterpreterBuilder {
    interner: SharedInterner,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: Option<usize>,
    prelude: bool,
}

impl InterpreterBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        InterpreterBuilder {
            interner,
            print_handler: None,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            prelude: true,
        }
    }

    /// Where `print` and `println` write.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Maximum nesting of calls; `None` removes the limit.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Start with an empty built-in table.
    #[must_use]
    pub fn without_prelude(mut self) -> Self {
        self.prelude = false;
        self
    }

    pub fn build(self) -> Interpreter {
        let mut builtins = Builtins::new();
        let mut natives = Vec::new();
        if self.prelude {
            for spec in prelude() {
                let name = self.interner.intern(spec.name);
                let native = NativeFunction::new(name, spec.name, spec.signature, spec.func);
                let index = builtins.declare(name, Type::Function(Rc::clone(native.signature())));
                debug_assert_eq!(index, natives.len());
                natives.push(Value::function(native));
            }
        }
        debug!(natives = natives.len(), max_depth = ?self.max_call_depth, "interpreter built");

        let globals = Environment::new();
        Interpreter {
            interner: self.interner,
            env: globals.clone(),
            globals,
            natives,
            builtins: Rc::new(builtins),
            call_stack: CallStack::new(self.max_call_depth),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
        }
    }
}
