//! Static typing of operators.
//!
//! These rules mirror the evaluator's operator semantics: a `null` operand
//! of an arithmetic, comparison, bitwise or shift operator makes the
//! result `null`, and int-to-float promotion happens only here.

use sepia_ir::ast::{BinaryOp, OpClass, UnaryOp};
use sepia_ir::Type;

/// Result type of `left op right`, or `None` if the operands are invalid.
pub(crate) fn binary_result_type(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    if left.is_error() || right.is_error() {
        return Some(Type::Error);
    }
    if op.propagates_null() && (matches!(left, Type::Null) || matches!(right, Type::Null)) {
        return Some(Type::Null);
    }
    match op.class() {
        OpClass::Equality => Some(Type::Bool),
        OpClass::Logical => {
            (matches!(left, Type::Bool) && matches!(right, Type::Bool)).then_some(Type::Bool)
        }
        OpClass::Arithmetic => match (left, right) {
            (Type::String, Type::String) if op == BinaryOp::Add => Some(Type::String),
            (Type::Int, Type::Int) => Some(Type::Int),
            (l, r) if l.is_numeric() && r.is_numeric() => Some(Type::Float),
            _ => None,
        },
        OpClass::Comparison => {
            (left.is_numeric() && right.is_numeric()).then_some(Type::Bool)
        }
        OpClass::Bitwise | OpClass::Shift => {
            (matches!(left, Type::Int) && matches!(right, Type::Int)).then_some(Type::Int)
        }
    }
}

/// Result type of `op operand`, or `None` if the operand is invalid.
pub(crate) fn unary_result_type(op: UnaryOp, operand: &Type) -> Option<Type> {
    match (op, operand) {
        (_, Type::Error) => Some(Type::Error),
        (UnaryOp::Neg | UnaryOp::BitNot, Type::Null) => Some(Type::Null),
        (UnaryOp::Neg, Type::Int | Type::Float) => Some(operand.clone()),
        (UnaryOp::Not, Type::Bool) => Some(Type::Bool),
        (UnaryOp::BitNot, Type::Int) => Some(Type::Int),
        _ => None,
    }
}
