//! The native prelude.
//!
//! Declaration order here fixes the built-in slot numbers shared by the
//! resolver's type table and the interpreter's value table. Arguments have
//! passed [`Callable::check_arguments`](crate::Callable::check_arguments)
//! before a native runs, so each one only sees its parameter type or null.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sepia_ir::{CallSignature, Type};

use crate::errors::{native_error, EvalResult};
use crate::value::NativeFn;
use crate::{Interpreter, Value};

/// One entry of the prelude.
pub(crate) struct NativeSpec {
    pub name: &'static str,
    pub signature: CallSignature,
    pub func: NativeFn,
}

fn native(name: &'static str, params: Vec<Type>, ret: Type, func: NativeFn) -> NativeSpec {
    NativeSpec {
        name,
        signature: CallSignature::new(params, ret),
        func,
    }
}

pub(crate) fn prelude() -> Vec<NativeSpec> {
    vec![
        native("print", vec![Type::String], Type::Void, print),
        native("println", vec![Type::String], Type::Void, println),
        native("clock", vec![], Type::Float, clock),
        native("sleep", vec![Type::Int], Type::Void, sleep),
        native("sqrt", vec![Type::Float], Type::Float, sqrt),
        native("floor", vec![Type::Float], Type::Int, floor),
        native("toFloat", vec![Type::Int], Type::Float, to_float),
        native("len", vec![Type::String], Type::Int, len),
        native("parseInt", vec![Type::String], Type::Int, parse_int),
    ]
}

fn print(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    if let [value] = args {
        interp.print_handler().print(&value.to_string());
    }
    Ok(Value::Void)
}

fn println(interp: &mut Interpreter, args: &[Value]) -> EvalResult {
    if let [value] = args {
        interp.print_handler().println(&value.to_string());
    }
    Ok(Value::Void)
}

fn clock(_: &mut Interpreter, _: &[Value]) -> EvalResult {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| native_error("clock", err.to_string()))?;
    Ok(Value::Float(elapsed.as_secs_f64()))
}

fn sleep(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    match args {
        [Value::Int(ms)] => {
            let ms = u64::try_from(*ms)
                .map_err(|_| native_error("sleep", format!("negative duration {ms}")))?;
            std::thread::sleep(Duration::from_millis(ms));
            Ok(Value::Void)
        }
        _ => Err(native_error("sleep", "expected a duration in milliseconds")),
    }
}

fn sqrt(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    Ok(match args {
        [Value::Float(x)] => Value::Float(x.sqrt()),
        _ => Value::Null,
    })
}

/// Largest magnitude an `f64` can have and still convert to `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn floor(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    match args {
        [Value::Float(x)] => {
            let floored = x.floor();
            if floored.is_finite() && (-I64_BOUND..I64_BOUND).contains(&floored) {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "range checked above and the value is integral"
                )]
                let n = floored as i64;
                Ok(Value::Int(n))
            } else {
                Err(native_error("floor", format!("{x} does not fit in an int")))
            }
        }
        _ => Ok(Value::Null),
    }
}

fn to_float(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    Ok(match args {
        #[expect(clippy::cast_precision_loss, reason = "explicit conversion")]
        [Value::Int(n)] => Value::Float(*n as f64),
        _ => Value::Null,
    })
}

fn len(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    match args {
        [Value::Str(s)] => i64::try_from(s.chars().count())
            .map(Value::Int)
            .map_err(|_| native_error("len", "string too long")),
        _ => Ok(Value::Null),
    }
}

/// Returns null when the text is not a decimal integer.
fn parse_int(_: &mut Interpreter, args: &[Value]) -> EvalResult {
    Ok(match args {
        [Value::Str(s)] => s
            .trim()
            .parse::<i64>()
            .map_or(Value::Null, Value::Int),
        _ => Value::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer_handler, InterpreterBuilder};
    use pretty_assertions::assert_eq;
    use sepia_ir::SharedInterner;

    fn interpreter() -> Interpreter {
        InterpreterBuilder::new(SharedInterner::new())
            .print_handler(buffer_handler())
            .build()
    }

    #[test]
    fn prelude_order_is_stable() {
        let names: Vec<&str> = prelude().iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec![
                "print", "println", "clock", "sleep", "sqrt", "floor", "toFloat", "len",
                "parseInt"
            ]
        );
    }

    #[test]
    fn printing_goes_to_the_handler() {
        let mut interp = interpreter();
        print(&mut interp, &[Value::from("a")]).ok();
        println(&mut interp, &[Value::Null]).ok();
        assert_eq!(interp.print_handler().output(), "anull\n");
    }

    #[test]
    fn numeric_conversions() {
        let mut interp = interpreter();
        assert_eq!(floor(&mut interp, &[Value::Float(-2.5)]), Ok(Value::Int(-3)));
        assert!(floor(&mut interp, &[Value::Float(1e300)]).is_err());
        assert!(floor(&mut interp, &[Value::Float(f64::NAN)]).is_err());
        assert_eq!(to_float(&mut interp, &[Value::Int(3)]), Ok(Value::Float(3.0)));
        assert_eq!(sqrt(&mut interp, &[Value::Float(9.0)]), Ok(Value::Float(3.0)));
        assert_eq!(sqrt(&mut interp, &[Value::Null]), Ok(Value::Null));
    }

    #[test]
    fn strings() {
        let mut interp = interpreter();
        assert_eq!(len(&mut interp, &[Value::from("héllo")]), Ok(Value::Int(5)));
        assert_eq!(parse_int(&mut interp, &[Value::from(" 42 ")]), Ok(Value::Int(42)));
        assert_eq!(parse_int(&mut interp, &[Value::from("4x")]), Ok(Value::Null));
    }

    #[test]
    fn sleep_rejects_negative_durations() {
        let mut interp = interpreter();
        assert_eq!(sleep(&mut interp, &[Value::Int(0)]), Ok(Value::Void));
        assert!(sleep(&mut interp, &[Value::Int(-1)]).is_err());
    }

    #[test]
    fn clock_is_after_the_epoch() {
        let mut interp = interpreter();
        assert!(matches!(clock(&mut interp, &[]), Ok(Value::Float(t)) if t > 0.0));
    }
}
