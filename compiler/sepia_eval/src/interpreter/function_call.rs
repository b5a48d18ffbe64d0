//! Function call evaluation methods for the Interpreter.

use std::rc::Rc;

use sepia_ir::{CallSignature, Span, Type};
use tracing::trace;

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::not_callable;
use crate::{EvalError, EvalErrorKind, EvalResult, Value};

impl Interpreter {
    /// Call `callee` with already-evaluated arguments.
    ///
    /// Arguments are checked against the signature before the call, the
    /// result after it. Errors raised inside the callee carry a backtrace of
    /// the calls active at that point.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult {
        let Value::Function(function) = callee else {
            return Err(not_callable(callee.ty()).at(span));
        };
        // The callee may reassign the variable that held it.
        let function = Rc::clone(function);
        function.check_arguments(&args).map_err(|err| err.at(span))?;

        self.call_stack
            .push(CallFrame {
                name: function.name(),
                call_span: span,
            })
            .map_err(|err| err.at(span))?;
        trace!(depth = self.call_stack.depth(), name = ?function.display_name(), "call");

        let result = function
            .call(self, args)
            .map_err(|err| self.call_stack.attach_backtrace(err, &self.interner));
        self.call_stack.pop();

        let value = result?;
        check_return(function.signature(), &value).map_err(|err| err.at(span))?;
        Ok(value)
    }
}

/// A `void` function must produce no value; any other function must
/// produce a value its return type accepts.
fn check_return(signature: &CallSignature, value: &Value) -> Result<(), EvalError> {
    let ok = match (&signature.ret, value) {
        (Type::Void, Value::Void) => true,
        (Type::Void, _) | (_, Value::Void) => false,
        (ret, value) => ret.accepts(&value.ty()),
    };
    if ok {
        Ok(())
    } else {
        Err(EvalErrorKind::ReturnTypeMismatch {
            expected: signature.ret.clone(),
            found: value.ty(),
        }
        .into())
    }
}
