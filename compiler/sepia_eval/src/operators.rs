//! Binary operator implementations for the evaluator.
//!
//! Dispatch is a match on the operator family, then on the operand tags.
//! `&&` and `||` short-circuit in the interpreter and only reach this
//! module once both sides are evaluated.

use sepia_ir::ast::{BinaryOp, OpClass};

use crate::errors::{
    division_by_zero, integer_overflow, invalid_binary_op, modulo_by_zero, EvalErrorKind,
    EvalResult,
};
use crate::Value;

#[inline]
#[expect(
    clippy::cast_precision_loss,
    reason = "int-to-float promotion is part of the operator semantics"
)]
fn promote(n: i64) -> f64 {
    n as f64
}

/// Both operands as floats, if both are numeric.
fn as_floats(left: &Value, right: &Value) -> Option<(f64, f64)> {
    let float = |v: &Value| match v {
        Value::Int(n) => Some(promote(*n)),
        Value::Float(x) => Some(*x),
        _ => None,
    };
    Some((float(left)?, float(right)?))
}

/// Evaluate `left op right`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over freshly evaluated operands"
)]
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    if op.propagates_null() && (left.is_null() || right.is_null()) {
        return Ok(Value::Null);
    }
    match op.class() {
        OpClass::Equality => {
            let equal = values_equal(&left, &right);
            Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        OpClass::Logical => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid_binary_op(op, left.ty(), right.ty())),
        },
        OpClass::Arithmetic => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => eval_int_arith(op, *a, *b),
            (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Value::from(joined))
            }
            _ => match as_floats(&left, &right) {
                Some((a, b)) => Ok(Value::Float(eval_float_arith(op, a, b))),
                None => Err(invalid_binary_op(op, left.ty(), right.ty())),
            },
        },
        OpClass::Comparison => {
            let result = match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => compare(op, a, b),
                _ => match as_floats(&left, &right) {
                    Some((a, b)) => compare(op, &a, &b),
                    None => return Err(invalid_binary_op(op, left.ty(), right.ty())),
                },
            };
            Ok(Value::Bool(result))
        }
        OpClass::Bitwise => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(match op {
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                _ => a ^ b,
            })),
            _ => Err(invalid_binary_op(op, left.ty(), right.ty())),
        },
        OpClass::Shift => match (&left, &right) {
            (Value::Int(a), Value::Int(b)) => eval_shift(op, *a, *b),
            _ => Err(invalid_binary_op(op, left.ty(), right.ty())),
        },
    }
}

fn eval_int_arith(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(|| integer_overflow("addition")),
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| integer_overflow("subtraction")),
        BinaryOp::Mul => a
            .checked_mul(b)
            .ok_or_else(|| integer_overflow("multiplication")),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => a.checked_div(b).ok_or_else(|| integer_overflow("division")),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        _ => a.checked_rem(b).ok_or_else(|| integer_overflow("remainder")),
    };
    result.map(Value::Int)
}

fn eval_float_arith(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        _ => a % b,
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

/// Both operands must fit in 32 bits; the amount must also be a valid
/// shift for a 64-bit integer.
fn eval_shift(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    for value in [a, b] {
        if i32::try_from(value).is_err() {
            return Err(EvalErrorKind::ShiftOutOfRange { value }.into());
        }
    }
    let amount = u32::try_from(b).map_err(|_| EvalErrorKind::ShiftOutOfRange { value: b })?;
    let shifted = if op == BinaryOp::Shl {
        a.checked_shl(amount)
    } else {
        a.checked_shr(amount)
    };
    shifted
        .map(Value::Int)
        .ok_or_else(|| EvalErrorKind::ShiftOutOfRange { value: b }.into())
}

/// `==` semantics: numbers compare after promotion, null equals only null,
/// functions compare by identity, other mismatched types are unequal.
#[expect(clippy::float_cmp, reason = "IEEE equality is the language's equality")]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            as_floats(left, right).is_some_and(|(a, b)| a == b)
        }
        _ => left == right,
    }
}
