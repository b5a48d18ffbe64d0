//! Runtime values and callables.

use std::fmt;
use std::rc::Rc;

use sepia_ir::ast::FunctionDecl;
use sepia_ir::{CallSignature, Name, StringInterner, Type};

use crate::errors::{ArgumentMismatch, EvalErrorKind, EvalResult};
use crate::{EvalError, Environment, Interpreter};

/// A runtime value. The runtime type is derived from the tag.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Null,
    /// Result of a call to a function that returns nothing.
    Void,
    Function(Rc<dyn Callable>),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::Str(_) => Type::String,
            Value::Null => Type::Null,
            Value::Void => Type::Void,
            Value::Function(f) => Type::Function(Rc::clone(f.signature())),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn function(callable: impl Callable + 'static) -> Self {
        Value::Function(Rc::new(callable))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl PartialEq for Value {
    #[expect(clippy::float_cmp, reason = "values compare exactly")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
            (Value::Function(a), Value::Function(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => fmt_float(*x, f),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
            Value::Void => f.write_str("void"),
            Value::Function(func) => match func.display_name() {
                Some(name) => write!(f, "<func {name}>"),
                None => f.write_str("<func>"),
            },
        }
    }
}

/// Floats always show a fractional part so they read differently from ints.
fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

/// Anything that can be called: user closures and natives.
pub trait Callable: fmt::Debug {
    /// Declared name; `None` for anonymous functions.
    fn name(&self) -> Option<Name>;

    /// Name for messages, when it is already known as text.
    fn display_name(&self) -> Option<&str>;

    fn signature(&self) -> &Rc<CallSignature>;

    /// Run the function. Arguments have already been checked with
    /// [`Callable::check_arguments`].
    fn call(&self, interp: &mut Interpreter, args: Vec<Value>) -> EvalResult;

    /// Whether this callable holds `frame` as its closure.
    fn captures(&self, _frame: &Environment) -> bool {
        false
    }

    /// Validate arity, then every argument's runtime type against its
    /// parameter. All mismatches are collected: one is reported on its own,
    /// several as an aggregate.
    fn check_arguments(&self, args: &[Value]) -> Result<(), EvalError> {
        let signature = self.signature();
        if signature.arity() != args.len() {
            return Err(EvalErrorKind::ArityMismatch {
                expected: signature.arity(),
                found: args.len(),
            }
            .into());
        }
        let mut mismatches: Vec<ArgumentMismatch> = signature
            .params
            .iter()
            .zip(args)
            .enumerate()
            .filter_map(|(index, (expected, arg))| {
                let found = arg.ty();
                (!expected.accepts(&found)).then(|| ArgumentMismatch {
                    index,
                    expected: expected.clone(),
                    found,
                })
            })
            .collect();
        match mismatches.len() {
            0 => Ok(()),
            1 => Err(EvalErrorKind::ArgumentTypeMismatch {
                mismatch: mismatches.remove(0),
            }
            .into()),
            _ => Err(EvalErrorKind::InvalidArguments { mismatches }.into()),
        }
    }
}

/// A user function closed over the frame it was declared in.
pub struct FunctionValue {
    decl: Rc<FunctionDecl>,
    signature: Rc<CallSignature>,
    closure: Environment,
    name: Option<&'static str>,
}

impl FunctionValue {
    pub fn new(decl: Rc<FunctionDecl>, closure: Environment, interner: &StringInterner) -> Self {
        let signature = decl.info.with(|info| Rc::clone(&info.signature));
        let name = decl.name.map(|name| interner.lookup(name));
        FunctionValue {
            decl,
            signature,
            closure,
            name,
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

impl Callable for FunctionValue {
    fn name(&self) -> Option<Name> {
        self.decl.name
    }

    fn display_name(&self) -> Option<&str> {
        self.name
    }

    fn signature(&self) -> &Rc<CallSignature> {
        &self.signature
    }

    fn captures(&self, frame: &Environment) -> bool {
        self.closure.ptr_eq(frame)
    }

    fn call(&self, interp: &mut Interpreter, args: Vec<Value>) -> EvalResult {
        let frame = self.closure.child();
        let param_indices = self.decl.info.with(|info| info.param_indices.clone());
        for (((param, ty), value), expected) in self
            .decl
            .params
            .iter()
            .zip(&self.signature.params)
            .zip(args)
            .zip(param_indices)
        {
            let found = frame.declare(param.name, ty.clone(), value);
            if found != expected {
                return Err(crate::environment::EnvError::SlotMismatch {
                    name: param.name,
                    expected,
                    found,
                }
                .into());
            }
        }
        interp.exec_function_body(&self.decl.body, frame)
    }
}

/// Host implementation of a built-in.
pub type NativeFn = fn(&mut Interpreter, &[Value]) -> EvalResult;

/// A built-in function.
pub struct NativeFunction {
    name: Name,
    text: &'static str,
    signature: Rc<CallSignature>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: Name, text: &'static str, signature: CallSignature, func: NativeFn) -> Self {
        NativeFunction {
            name,
            text,
            signature: Rc::new(signature),
            func,
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.text)
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> Option<Name> {
        Some(self.name)
    }

    fn display_name(&self) -> Option<&str> {
        Some(self.text)
    }

    fn signature(&self) -> &Rc<CallSignature> {
        &self.signature
    }

    fn call(&self, interp: &mut Interpreter, args: Vec<Value>) -> EvalResult {
        (self.func)(interp, &args)
    }
}
