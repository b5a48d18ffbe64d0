//! Tests for binary operator implementations.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sepia_ir::ast::BinaryOp;
use sepia_ir::Type;

use crate::{evaluate_binary, values_equal, EvalErrorKind, EvalResult, Value};

fn eval(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalErrorKind> {
    evaluate_binary(op, left, right).map_err(|err| err.kind)
}

#[test]
fn int_arithmetic() {
    assert_eq!(eval(BinaryOp::Add, Value::Int(2), Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(eval(BinaryOp::Sub, Value::Int(5), Value::Int(8)), Ok(Value::Int(-3)));
    assert_eq!(eval(BinaryOp::Mul, Value::Int(4), Value::Int(3)), Ok(Value::Int(12)));
    assert_eq!(eval(BinaryOp::Div, Value::Int(5), Value::Int(2)), Ok(Value::Int(2)));
    assert_eq!(eval(BinaryOp::Div, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-3)));
    assert_eq!(eval(BinaryOp::Mod, Value::Int(-7), Value::Int(2)), Ok(Value::Int(-1)));
}

#[test]
fn mixed_arithmetic_promotes_to_float() {
    assert_eq!(eval(BinaryOp::Add, Value::Int(1), Value::Float(2.0)), Ok(Value::Float(3.0)));
    assert_eq!(eval(BinaryOp::Div, Value::Float(5.0), Value::Int(2)), Ok(Value::Float(2.5)));
    assert_eq!(eval(BinaryOp::Mod, Value::Float(7.5), Value::Int(2)), Ok(Value::Float(1.5)));
}

#[test]
fn zero_divisors() {
    assert_eq!(
        eval(BinaryOp::Div, Value::Int(1), Value::Int(0)),
        Err(EvalErrorKind::DivisionByZero)
    );
    assert_eq!(
        eval(BinaryOp::Mod, Value::Int(1), Value::Int(0)),
        Err(EvalErrorKind::ModuloByZero)
    );
    // IEEE semantics for floats.
    assert!(matches!(
        eval(BinaryOp::Div, Value::Float(1.0), Value::Int(0)),
        Ok(Value::Float(x)) if x.is_infinite()
    ));
}

#[test]
fn overflow_is_an_error() {
    assert_eq!(
        eval(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1)),
        Err(EvalErrorKind::IntegerOverflow {
            operation: "addition"
        })
    );
    assert_eq!(
        eval(BinaryOp::Div, Value::Int(i64::MIN), Value::Int(-1)),
        Err(EvalErrorKind::IntegerOverflow {
            operation: "division"
        })
    );
}

#[test]
fn string_concatenation() {
    assert_eq!(
        eval(BinaryOp::Add, Value::from("ab"), Value::from("cd")),
        Ok(Value::from("abcd"))
    );
    assert_eq!(
        eval(BinaryOp::Add, Value::from("a"), Value::Int(1)),
        Err(EvalErrorKind::InvalidBinaryOp {
            op: BinaryOp::Add,
            left: Type::String,
            right: Type::Int
        })
    );
    assert!(eval(BinaryOp::Sub, Value::from("a"), Value::from("b")).is_err());
}

#[test]
fn null_propagates_through_arithmetic_and_comparison() {
    assert_eq!(eval(BinaryOp::Add, Value::Null, Value::Int(1)), Ok(Value::Null));
    assert_eq!(eval(BinaryOp::Lt, Value::Float(1.0), Value::Null), Ok(Value::Null));
    assert_eq!(eval(BinaryOp::Shl, Value::Null, Value::Int(1)), Ok(Value::Null));
}

#[test]
fn equality_does_not_propagate_null() {
    assert_eq!(eval(BinaryOp::Eq, Value::Null, Value::Null), Ok(Value::Bool(true)));
    assert_eq!(eval(BinaryOp::Eq, Value::Int(1), Value::Null), Ok(Value::Bool(false)));
    assert_eq!(eval(BinaryOp::NotEq, Value::Null, Value::Int(1)), Ok(Value::Bool(true)));
}

#[test]
fn equality_across_types() {
    assert!(values_equal(&Value::Int(2), &Value::Float(2.0)));
    assert!(!values_equal(&Value::Int(2), &Value::from("2")));
    assert!(values_equal(&Value::from("x"), &Value::from("x")));
    assert!(!values_equal(&Value::Bool(true), &Value::Int(1)));
}

#[test]
fn comparisons() {
    assert_eq!(eval(BinaryOp::Lt, Value::Int(2), Value::Int(3)), Ok(Value::Bool(true)));
    assert_eq!(eval(BinaryOp::GtEq, Value::Int(2), Value::Float(2.0)), Ok(Value::Bool(true)));
    assert!(eval(BinaryOp::Lt, Value::from("a"), Value::from("b")).is_err());
}

#[test]
fn bitwise_and_shifts() {
    assert_eq!(eval(BinaryOp::BitAnd, Value::Int(6), Value::Int(3)), Ok(Value::Int(2)));
    assert_eq!(eval(BinaryOp::BitOr, Value::Int(6), Value::Int(3)), Ok(Value::Int(7)));
    assert_eq!(eval(BinaryOp::BitXor, Value::Int(6), Value::Int(3)), Ok(Value::Int(5)));
    assert_eq!(eval(BinaryOp::Shl, Value::Int(1), Value::Int(40)), Ok(Value::Int(1 << 40)));
    assert_eq!(eval(BinaryOp::Shr, Value::Int(-8), Value::Int(1)), Ok(Value::Int(-4)));
}

#[test]
fn shift_operands_must_fit_32_bits() {
    assert_eq!(
        eval(BinaryOp::Shl, Value::Int(1 << 40), Value::Int(1)),
        Err(EvalErrorKind::ShiftOutOfRange { value: 1 << 40 })
    );
    assert_eq!(
        eval(BinaryOp::Shl, Value::Int(1), Value::Int(-1)),
        Err(EvalErrorKind::ShiftOutOfRange { value: -1 })
    );
    assert_eq!(
        eval(BinaryOp::Shr, Value::Int(1), Value::Int(64)),
        Err(EvalErrorKind::ShiftOutOfRange { value: 64 })
    );
}

#[test]
fn logical_requires_bools() {
    assert_eq!(
        eval(BinaryOp::And, Value::Bool(true), Value::Bool(false)),
        Ok(Value::Bool(false))
    );
    assert!(eval(BinaryOp::Or, Value::Int(1), Value::Bool(false)).is_err());
}

fn checked(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        _ => a.checked_rem(b),
    }
}

fn as_int(result: &EvalResult) -> Option<i64> {
    match result {
        Ok(Value::Int(n)) => Some(*n),
        _ => None,
    }
}

proptest! {
    #[test]
    fn int_arithmetic_matches_checked_ops(
        a in any::<i64>(),
        b in any::<i64>(),
        op in prop::sample::select(vec![
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Mul,
            BinaryOp::Div,
            BinaryOp::Mod,
        ]),
    ) {
        let result = evaluate_binary(op, Value::Int(a), Value::Int(b));
        prop_assert_eq!(as_int(&result), checked(op, a, b));
    }

    #[test]
    fn equality_is_symmetric(a in -1000i64..1000, b in -1000i64..1000) {
        #[expect(clippy::cast_precision_loss, reason = "small test values")]
        let bf = b as f64;
        prop_assert_eq!(
            values_equal(&Value::Int(a), &Value::Float(bf)),
            values_equal(&Value::Float(bf), &Value::Int(a))
        );
    }
}
