//! Guard that restores the active frame when a nested frame ends.
//!
//! [`Interpreter::scoped`] swaps in a new frame and returns a guard that
//! puts the previous one back on drop, including when evaluation bails out
//! early with `?`. The finished frame is released on the way out.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::Environment;

pub(crate) struct ScopedInterpreter<'a> {
    interpreter: &'a mut Interpreter,
    saved: Option<Environment>,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            std::mem::replace(&mut self.interpreter.env, saved).release();
        }
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Make `frame` the active frame until the guard drops.
    pub(crate) fn scoped(&mut self, frame: Environment) -> ScopedInterpreter<'_> {
        let saved = std::mem::replace(&mut self.env, frame);
        ScopedInterpreter {
            interpreter: self,
            saved: Some(saved),
        }
    }

    /// Run `f` with `frame` active.
    pub(crate) fn with_frame<R>(
        &mut self,
        frame: Environment,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let mut scoped = self.scoped(frame);
        f(&mut scoped)
    }
}
