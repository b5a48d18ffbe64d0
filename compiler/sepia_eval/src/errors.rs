//! Evaluation errors.
//!
//! Every runtime failure is an [`EvalError`]: a structured [`EvalErrorKind`]
//! plus the span of the expression that failed and, for failures inside a
//! call, a backtrace of the active calls. Each kind maps to one `E6xxx`
//! code; slot faults between resolver and evaluator map to `E9001`.

use std::fmt;

use sepia_diagnostic::{Diagnostic, ErrorCode};
use sepia_ir::ast::{BinaryOp, UnaryOp};
use sepia_ir::{Span, Type};

use crate::environment::EnvError;

/// Result of evaluating an expression or calling a function.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// One argument whose runtime type the parameter does not accept.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentMismatch {
    /// Zero-based position in the argument list.
    pub index: usize,
    pub expected: Type,
    pub found: Type,
}

impl fmt::Display for ArgumentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "argument {} expects `{}`, found `{}`",
            self.index + 1,
            self.expected,
            self.found
        )
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },
    #[error("shift operand {value} is outside the 32-bit range")]
    ShiftOutOfRange { value: i64 },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type },
    #[error("cannot apply `{op}` to `{left}` and `{right}`")]
    InvalidBinaryOp { op: BinaryOp, left: Type, right: Type },
    #[error("cannot apply `{op}` to `{operand}`")]
    InvalidUnaryOp { op: UnaryOp, operand: Type },
    #[error("{mismatch}")]
    ArgumentTypeMismatch { mismatch: ArgumentMismatch },
    #[error("{} arguments have the wrong type", mismatches.len())]
    InvalidArguments { mismatches: Vec<ArgumentMismatch> },
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("return type mismatch: expected `{expected}`, found `{found}`")]
    ReturnTypeMismatch { expected: Type, found: Type },
    #[error("value of type `{ty}` is not callable")]
    NotCallable { ty: Type },
    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow { depth: usize },
    #[error("{function}: {message}")]
    Native {
        function: &'static str,
        message: String,
    },
    #[error("{what} are not supported at runtime")]
    Unsupported { what: &'static str },
    #[error("internal evaluator error: {0}")]
    Internal(#[from] EnvError),
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::DivisionByZero => ErrorCode::E6001,
            EvalErrorKind::ModuloByZero => ErrorCode::E6002,
            EvalErrorKind::IntegerOverflow { .. } => ErrorCode::E6003,
            EvalErrorKind::ShiftOutOfRange { .. } => ErrorCode::E6004,
            EvalErrorKind::TypeMismatch { .. } => ErrorCode::E6005,
            EvalErrorKind::InvalidBinaryOp { .. } => ErrorCode::E6006,
            EvalErrorKind::InvalidUnaryOp { .. } => ErrorCode::E6007,
            EvalErrorKind::ArgumentTypeMismatch { .. } | EvalErrorKind::InvalidArguments { .. } => {
                ErrorCode::E6008
            }
            EvalErrorKind::ArityMismatch { .. } => ErrorCode::E6009,
            EvalErrorKind::ReturnTypeMismatch { .. } => ErrorCode::E6010,
            EvalErrorKind::NotCallable { .. } => ErrorCode::E6011,
            EvalErrorKind::StackOverflow { .. } => ErrorCode::E6012,
            EvalErrorKind::Native { .. } => ErrorCode::E6020,
            EvalErrorKind::Unsupported { .. } => ErrorCode::E6099,
            EvalErrorKind::Internal(_) => ErrorCode::E9001,
        }
    }
}

/// One active call at the moment an error was raised.
#[derive(Clone, Debug, PartialEq)]
pub struct BacktraceFrame {
    pub name: String,
    /// Where the call was made.
    pub span: Span,
}

/// Active calls, innermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        EvalBacktrace { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A runtime error with its location.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            backtrace: None,
        }
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, "evaluation failed here");
        }
        match &self.kind {
            EvalErrorKind::InvalidArguments { mismatches } => {
                for mismatch in mismatches {
                    diag = diag.with_note(mismatch.to_string());
                }
            }
            EvalErrorKind::StackOverflow { .. } => {
                diag = diag.with_suggestion("raise the limit with `--max-depth`");
            }
            EvalErrorKind::Internal(_) => {
                diag = diag
                    .with_note("the resolver and the evaluator disagree about a variable slot");
            }
            _ => {}
        }
        if let Some(backtrace) = self.backtrace {
            for frame in backtrace.frames {
                diag =
                    diag.with_secondary_label(frame.span, format!("in call to `{}`", frame.name));
            }
        }
        diag
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for EvalError {}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

impl From<EnvError> for EvalError {
    fn from(err: EnvError) -> Self {
        EvalError::new(EvalErrorKind::Internal(err))
    }
}

// Constructors for the common cases.

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalErrorKind::ModuloByZero.into()
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalErrorKind::IntegerOverflow { operation }.into()
}

#[cold]
pub fn type_mismatch(expected: &Type, found: &Type) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.clone(),
        found: found.clone(),
    }
    .into()
}

#[cold]
pub fn invalid_binary_op(op: BinaryOp, left: Type, right: Type) -> EvalError {
    EvalErrorKind::InvalidBinaryOp { op, left, right }.into()
}

#[cold]
pub fn not_callable(ty: Type) -> EvalError {
    EvalErrorKind::NotCallable { ty }.into()
}

#[cold]
pub fn native_error(function: &'static str, message: impl Into<String>) -> EvalError {
    EvalErrorKind::Native {
        function,
        message: message.into(),
    }
    .into()
}
