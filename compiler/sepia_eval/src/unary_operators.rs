//! Unary operator implementations for the evaluator.

use sepia_ir::ast::UnaryOp;

use crate::errors::{integer_overflow, EvalErrorKind, EvalResult};
use crate::Value;

/// Evaluate `op value`. `-` and `~` pass null through.
pub fn evaluate_unary(op: UnaryOp, value: Value) -> EvalResult {
    match (op, &value) {
        (UnaryOp::Neg | UnaryOp::BitNot, Value::Null) => Ok(Value::Null),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        _ => Err(EvalErrorKind::InvalidUnaryOp {
            op,
            operand: value.ty(),
        }
        .into()),
    }
}
