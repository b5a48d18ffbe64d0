use std::rc::Rc;

use pretty_assertions::assert_eq;
use sepia_ir::{CallSignature, Name, Type};

use super::{EnvError, Environment};
use crate::errors::EvalResult;
use crate::{Callable, Interpreter, Value};

const X: Name = Name::from_raw(100);
const Y: Name = Name::from_raw(101);

#[test]
fn declare_appends_per_name() {
    let env = Environment::new();
    assert_eq!(env.declare(X, Type::Int, Value::Int(1)), 0);
    assert_eq!(env.declare(Y, Type::Int, Value::Int(2)), 0);
    assert_eq!(env.declare(X, Type::String, Value::from("s")), 1);
    assert_eq!(env.get(X, 0, 0), Ok(Value::Int(1)));
    assert_eq!(env.get(X, 0, 1), Ok(Value::from("s")));
    assert_eq!(env.len(), 3);
}

#[test]
fn get_returns_last_update() {
    let env = Environment::new();
    env.declare(X, Type::Int, Value::Null);
    env.update(X, 0, 0, Value::Int(7)).ok();
    env.update(X, 0, 0, Value::Int(9)).ok();
    assert_eq!(env.get(X, 0, 0), Ok(Value::Int(9)));
    assert_eq!(env.slot_type(X, 0, 0), Ok(Type::Int));
}

#[test]
fn steps_walk_parents() {
    let global = Environment::new();
    global.declare(X, Type::Int, Value::Int(1));
    let block = global.child();
    let inner = block.child();
    inner.declare(X, Type::Int, Value::Int(2));

    assert_eq!(inner.get(X, 0, 0), Ok(Value::Int(2)));
    assert_eq!(inner.get(X, 2, 0), Ok(Value::Int(1)));
    inner.update(X, 2, 0, Value::Int(5)).ok();
    assert_eq!(global.get(X, 0, 0), Ok(Value::Int(5)));
    assert!(inner.ancestor(2).is_ok_and(|env| env.ptr_eq(&global)));
}

#[test]
fn out_of_range_access_is_an_error() {
    let env = Environment::new().child();
    env.declare(X, Type::Int, Value::Int(1));
    assert_eq!(env.get(X, 5, 0), Err(EnvError::MissingFrame { steps: 5 }));
    assert_eq!(
        env.get(X, 0, 3),
        Err(EnvError::MissingSlot {
            name: X,
            steps: 0,
            index: 3
        })
    );
    assert_eq!(
        env.update(Y, 1, 0, Value::Null),
        Err(EnvError::MissingSlot {
            name: Y,
            steps: 1,
            index: 0
        })
    );
}

#[test]
fn closures_keep_frames_alive() {
    let captured = {
        let global = Environment::new();
        let frame = global.child();
        frame.declare(X, Type::Int, Value::Int(42));
        frame
    };
    assert_eq!(captured.get(X, 0, 0), Ok(Value::Int(42)));
}

/// A callable that does nothing but hold its closure frame.
#[derive(Debug)]
struct Closure {
    frame: Environment,
    signature: Rc<CallSignature>,
}

impl Closure {
    fn over(frame: &Environment) -> Value {
        Value::function(Closure {
            frame: frame.clone(),
            signature: Rc::new(CallSignature::new(Vec::new(), Type::Void)),
        })
    }
}

impl Callable for Closure {
    fn name(&self) -> Option<Name> {
        None
    }

    fn display_name(&self) -> Option<&str> {
        None
    }

    fn signature(&self) -> &Rc<CallSignature> {
        &self.signature
    }

    fn call(&self, _interp: &mut Interpreter, _args: Vec<Value>) -> EvalResult {
        Ok(Value::Void)
    }

    fn captures(&self, frame: &Environment) -> bool {
        self.frame.ptr_eq(frame)
    }
}

fn function_type() -> Type {
    Type::Function(Rc::new(CallSignature::new(Vec::new(), Type::Void)))
}

#[test]
fn release_frees_a_frame_held_only_by_its_own_functions() {
    let global = Environment::new();
    let frame = global.child();
    frame.declare(X, function_type(), Closure::over(&frame));
    frame.declare(Y, function_type(), Closure::over(&frame));
    assert_eq!(global.0.handle_count(), 2);

    frame.release();
    assert_eq!(global.0.handle_count(), 1);
}

#[test]
fn release_keeps_frames_that_are_still_reachable() {
    let global = Environment::new();
    let frame = global.child();
    let escaped = Closure::over(&frame);
    frame.declare(X, function_type(), escaped.clone());
    frame.declare(Y, Type::Int, Value::Int(3));
    let handle = frame.clone();

    frame.release();
    assert_eq!(handle.get(Y, 0, 0), Ok(Value::Int(3)));
    drop(escaped);

    let frame = global.child();
    frame.declare(X, function_type(), Closure::over(&frame));
    let inner = frame.child();
    frame.release();
    assert!(inner.get(X, 1, 0).is_ok());
}

#[test]
fn snapshot_and_restore() {
    let env = Environment::new();
    env.declare(X, Type::Int, Value::Int(1));
    let snapshot = env.snapshot();

    env.update(X, 0, 0, Value::Int(2)).ok();
    env.declare(X, Type::Int, Value::Int(3));
    env.declare(Y, Type::Bool, Value::Bool(true));
    assert_eq!(env.len(), 3);

    env.restore(snapshot);
    assert_eq!(env.len(), 1);
    assert_eq!(env.get(X, 0, 0), Ok(Value::Int(1)));
    assert!(env.get(Y, 0, 0).is_err());
}
