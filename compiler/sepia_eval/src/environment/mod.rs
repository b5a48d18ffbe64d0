//! Runtime environment chain.
//!
//! Frames are shared handles so a closure can keep its defining frame
//! alive after the call that created it returns. Each frame maps a name to
//! the slots declared under it, in declaration order; the resolver's
//! `(steps, index)` pairs address these slots directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sepia_ir::{Name, Type};
use smallvec::SmallVec;
use tracing::trace;

use crate::Value;

/// A single-threaded shared cell.
///
/// All frames are allocated through [`LocalScope::new`]; the handle is
/// `Rc`, so frames never cross threads.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

/// A declared variable: its static type and current value.
#[derive(Clone, Debug)]
pub struct Slot {
    pub ty: Type,
    pub value: Value,
}

type Slots = FxHashMap<Name, SmallVec<[Slot; 1]>>;

/// One frame of the chain.
#[derive(Default)]
pub struct Frame {
    parent: Option<Environment>,
    slots: Slots,
}

/// Slot access that does not match what the resolver computed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("no environment frame {steps} levels up")]
    MissingFrame { steps: usize },
    #[error("slot {index} of {name:?} does not exist {steps} frames up")]
    MissingSlot {
        name: Name,
        steps: usize,
        index: usize,
    },
    #[error("{name:?} was declared in slot {found}, expected slot {expected}")]
    SlotMismatch {
        name: Name,
        expected: usize,
        found: usize,
    },
    #[error("identifier {name:?} was never resolved")]
    Unresolved { name: Name },
    #[error("built-in slot {index} does not exist")]
    MissingBuiltin { index: usize },
}

/// Saved contents of a frame, for rollback.
#[derive(Clone)]
pub struct EnvSnapshot {
    slots: Slots,
}

/// Handle to a frame in the environment chain.
#[derive(Clone)]
pub struct Environment(LocalScope<Frame>);

impl Environment {
    /// A root frame with no parent.
    pub fn new() -> Self {
        Environment(LocalScope::new(Frame::default()))
    }

    /// A fresh frame whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment(LocalScope::new(Frame {
            parent: Some(self.clone()),
            slots: Slots::default(),
        }))
    }

    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// The frame `steps` parents up; `ancestor(0)` is `self`.
    pub fn ancestor(&self, steps: usize) -> Result<Environment, EnvError> {
        let mut env = self.clone();
        for _ in 0..steps {
            env = env.parent().ok_or(EnvError::MissingFrame { steps })?;
        }
        Ok(env)
    }

    /// Drop this handle to a frame that has finished running.
    ///
    /// A function declared in a frame closes over that same frame, so the
    /// two keep each other alive. When those functions are the only other
    /// owners of the frame, its slots are cleared to free both.
    pub fn release(self) {
        if self.0.handle_count() == 1 {
            return;
        }
        let mut self_captures = 0;
        for slot in self.0.borrow().slots.values().flatten() {
            if let Value::Function(callable) = &slot.value {
                if callable.captures(&self) {
                    if Rc::strong_count(callable) > 1 {
                        return;
                    }
                    self_captures += 1;
                }
            }
        }
        if self_captures > 0 && self.0.handle_count() == self_captures + 1 {
            trace!(self_captures, "release frame");
            let slots = std::mem::take(&mut self.0.borrow_mut().slots);
            drop(slots);
        }
    }

    /// Append a slot for `name` in this frame and return its index.
    pub fn declare(&self, name: Name, ty: Type, value: Value) -> usize {
        let mut frame = self.0.borrow_mut();
        let slots = frame.slots.entry(name).or_default();
        slots.push(Slot { ty, value });
        trace!(?name, index = slots.len() - 1, "declare");
        slots.len() - 1
    }

    pub fn get(&self, name: Name, steps: usize, index: usize) -> Result<Value, EnvError> {
        self.with_slot(name, steps, index, |slot| slot.value.clone())
    }

    /// Declared type of a slot.
    pub fn slot_type(&self, name: Name, steps: usize, index: usize) -> Result<Type, EnvError> {
        self.with_slot(name, steps, index, |slot| slot.ty.clone())
    }

    pub fn update(
        &self,
        name: Name,
        steps: usize,
        index: usize,
        value: Value,
    ) -> Result<(), EnvError> {
        let frame = self.ancestor(steps)?;
        let mut frame = frame.0.borrow_mut();
        let slot = frame
            .slots
            .get_mut(&name)
            .and_then(|slots| slots.get_mut(index))
            .ok_or(EnvError::MissingSlot { name, steps, index })?;
        slot.value = value;
        Ok(())
    }

    fn with_slot<R>(
        &self,
        name: Name,
        steps: usize,
        index: usize,
        f: impl FnOnce(&Slot) -> R,
    ) -> Result<R, EnvError> {
        let frame = self.ancestor(steps)?;
        let frame = frame.0.borrow();
        frame
            .slots
            .get(&name)
            .and_then(|slots| slots.get(index))
            .map(f)
            .ok_or(EnvError::MissingSlot { name, steps, index })
    }

    /// Copy this frame's slots. Parent frames are not included.
    pub fn snapshot(&self) -> EnvSnapshot {
        EnvSnapshot {
            slots: self.0.borrow().slots.clone(),
        }
    }

    /// Replace this frame's slots with a snapshot's.
    pub fn restore(&self, snapshot: EnvSnapshot) {
        self.0.borrow_mut().slots = snapshot.slots;
    }

    /// Number of slots declared in this frame, across all names.
    pub fn len(&self) -> usize {
        self.0.borrow().slots.values().map(SmallVec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    // Frames can reach themselves through captured closures; print shape only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        f.debug_struct("Environment")
            .field("slots", &self.len())
            .field("has_parent", &frame.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
