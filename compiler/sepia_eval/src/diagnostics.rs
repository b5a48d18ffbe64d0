//! Call-stack tracking for recursion limits and backtraces.

use sepia_ir::{Name, Span, StringInterner};

use crate::errors::{BacktraceFrame, EvalBacktrace, EvalErrorKind};
use crate::EvalError;

/// Default maximum number of nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Calls kept in a captured backtrace, innermost first.
const MAX_BACKTRACE_FRAMES: usize = 16;

/// One active call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// `None` for anonymous functions.
    pub name: Option<Name>,
    pub call_span: Span,
}

/// Live call stack. `push` enforces the depth limit.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, or fail with `StackOverflow` without pushing.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(EvalErrorKind::StackOverflow { depth: max }.into());
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on an empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Drop every frame, after an error unwound past them.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Snapshot the innermost calls, innermost first.
    pub fn capture(&self, interner: &StringInterner) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .take(MAX_BACKTRACE_FRAMES)
            .map(|frame| BacktraceFrame {
                name: frame
                    .name
                    .map_or("<anonymous>", |name| interner.lookup(name))
                    .to_owned(),
                span: frame.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace unless the error already has one or no call is
    /// active.
    pub fn attach_backtrace(&self, err: EvalError, interner: &StringInterner) -> EvalError {
        if self.frames.is_empty() || err.backtrace.is_some() {
            return err;
        }
        err.with_backtrace(self.capture(interner))
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_CALL_DEPTH))
    }
}
