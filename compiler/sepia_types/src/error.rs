//! Semantic errors and their diagnostics.

use sepia_diagnostic::{Diagnostic, ErrorCode};
use sepia_ir::{Span, Type};

use crate::scope::ScopeError;

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SemanticErrorKind {
    #[error("undeclared identifier `{name}`")]
    UndeclaredIdentifier {
        name: String,
        suggestion: Option<String>,
    },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type },
    #[error("expected {expected} argument{}, found {found}", plural_s(*expected))]
    ArityMismatch { expected: usize, found: usize },
    #[error("value of type `{ty}` is not callable")]
    NotCallable { ty: Type },
    #[error("return type mismatch: expected `{expected}`, found `{found}`")]
    ReturnTypeMismatch { expected: Type, found: Type },
    #[error("{name} does not return a value on every path")]
    MissingReturn { name: String, ret: Type },
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
    #[error("`{keyword}` outside of a loop")]
    LoopControlOutsideLoop { keyword: &'static str },
    #[error("cannot infer a type for `{name}` from a `void` initializer")]
    AmbiguousType { name: String },
    #[error("unknown type `{name}`")]
    UnknownType {
        name: String,
        suggestion: Option<String>,
    },
    #[error("invalid operand of type `{found}` for `{op}`")]
    InvalidOperand { op: &'static str, found: Type },
    #[error("invalid operands `{left}` and `{right}` for `{op}`")]
    InvalidOperands {
        op: &'static str,
        left: Type,
        right: Type,
    },
    #[error("{what} are not supported")]
    Unsupported { what: &'static str },
    #[error("internal resolver error: {0}")]
    Internal(#[from] ScopeError),
}

/// A semantic error at a location.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        SemanticError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            SemanticErrorKind::TypeMismatch { .. } => ErrorCode::E2001,
            SemanticErrorKind::UnknownType { .. } => ErrorCode::E2002,
            SemanticErrorKind::UndeclaredIdentifier { .. } => ErrorCode::E2003,
            SemanticErrorKind::ArityMismatch { .. } => ErrorCode::E2004,
            SemanticErrorKind::AmbiguousType { .. } => ErrorCode::E2005,
            SemanticErrorKind::NotCallable { .. } => ErrorCode::E2006,
            SemanticErrorKind::ReturnTypeMismatch { .. } => ErrorCode::E2007,
            SemanticErrorKind::MissingReturn { .. } => ErrorCode::E2008,
            SemanticErrorKind::ReturnOutsideFunction => ErrorCode::E2009,
            SemanticErrorKind::LoopControlOutsideLoop { .. } => ErrorCode::E2010,
            SemanticErrorKind::InvalidOperand { .. }
            | SemanticErrorKind::InvalidOperands { .. } => ErrorCode::E2011,
            SemanticErrorKind::Unsupported { .. } => ErrorCode::E2012,
            SemanticErrorKind::Internal(_) => ErrorCode::E9001,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        match self.kind {
            SemanticErrorKind::UndeclaredIdentifier { suggestion, .. }
            | SemanticErrorKind::UnknownType { suggestion, .. } => {
                let diag = diag.with_label(self.span, "not found in this scope");
                match suggestion {
                    Some(name) => diag.with_suggestion(format!("did you mean `{name}`?")),
                    None => diag,
                }
            }
            SemanticErrorKind::TypeMismatch { expected, found } => {
                let diag = diag.with_label(self.span, format!("expected `{expected}`"));
                match (expected, found) {
                    (Type::Float, Type::Int) => {
                        diag.with_suggestion("use `toFloat(x)` to convert int to float")
                    }
                    (Type::Int, Type::Float) => {
                        diag.with_suggestion("use `floor(x)` to convert float to int")
                    }
                    (Type::Int, Type::String) => {
                        diag.with_suggestion("use `parseInt(s)` to convert string to int")
                    }
                    (Type::String, _) => {
                        diag.with_suggestion("use `\"${x}\"` to convert to string")
                    }
                    _ => diag,
                }
            }
            SemanticErrorKind::MissingReturn { ret, .. } => diag
                .with_label(self.span, format!("expected `{ret}`"))
                .with_note(
                    "a function that declares a return type must end in `return` on every path",
                ),
            SemanticErrorKind::AmbiguousType { .. } => diag
                .with_label(self.span, "initializer has type `void`")
                .with_suggestion("add a type annotation"),
            SemanticErrorKind::LoopControlOutsideLoop { .. }
            | SemanticErrorKind::ReturnOutsideFunction => {
                diag.with_label(self.span, "not allowed here")
            }
            SemanticErrorKind::Unsupported { .. } => diag
                .with_label(self.span, "unsupported")
                .with_note("this construct is parsed but cannot be executed"),
            _ => diag.with_label(self.span, "here"),
        }
    }
}

/// Levenshtein edit distance between two strings.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];
    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b_len]
}

fn threshold(len: usize) -> usize {
    match len {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        _ => 3,
    }
}

/// Closest candidate within a length-dependent edit distance; ties break
/// alphabetically so suggestions are deterministic.
pub(crate) fn closest_match<'c>(
    target: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<&'c str> {
    let limit = threshold(target.chars().count());
    candidates
        .into_iter()
        .filter(|&c| c != target && target.len().abs_diff(c.len()) <= limit)
        .map(|c| (edit_distance(target, c), c))
        .filter(|&(distance, _)| distance <= limit)
        .min()
        .map(|(_, c)| c)
}
