//! Resolution slots filled in by the resolver and read by the evaluator.
//!
//! Every AST node owns a [`ResolveSlot`] initialised to a neutral default.
//! Resolution writes it exactly once per successful pass; evaluation only
//! reads it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{CallSignature, Type};

/// Interior-mutable annotation attached to an AST node.
#[derive(Default)]
pub struct ResolveSlot<T>(RefCell<T>);

impl<T> ResolveSlot<T> {
    pub fn new(value: T) -> Self {
        ResolveSlot(RefCell::new(value))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Borrow the annotation for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl<T: Clone> ResolveSlot<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for ResolveSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

/// Where an identifier's value lives at runtime.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Binding {
    #[default]
    Unresolved,
    /// Slot `index` of the name in the frame `steps` parents up.
    Local { steps: usize, index: usize },
    /// Entry in the immutable built-in table.
    Builtin(usize),
}

/// Annotation of an expression: its static type and, for identifiers and
/// assignments, the slot it refers to.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ResolveInfo {
    pub ty: Type,
    pub binding: Binding,
}

impl ResolveInfo {
    pub fn typed(ty: Type) -> Self {
        ResolveInfo {
            ty,
            binding: Binding::Unresolved,
        }
    }
}

/// Annotation of a function declaration or function expression.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionResolveInfo {
    pub signature: Rc<CallSignature>,
    /// Slot of the function's name in its declaring frame; `None` for
    /// anonymous functions.
    pub index: Option<usize>,
    /// Slot index of each parameter in the activation frame.
    pub param_indices: Vec<usize>,
}

impl FunctionResolveInfo {
    pub fn return_type(&self) -> &Type {
        &self.signature.ret
    }

    pub fn argument_types(&self) -> &[Type] {
        &self.signature.params
    }

    pub fn ty(&self) -> Type {
        Type::Function(Rc::clone(&self.signature))
    }
}

impl Default for FunctionResolveInfo {
    fn default() -> Self {
        FunctionResolveInfo {
            signature: Rc::new(CallSignature::new(Vec::new(), Type::Error)),
            index: None,
            param_indices: Vec::new(),
        }
    }
}

/// Annotation of a statement.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct StmtInfo {
    /// Every execution path through the statement ends in `return`.
    pub always_returns: bool,
    /// Declared type for `let`.
    pub ty: Type,
    /// Slot index for `let`.
    pub index: Option<usize>,
}
