//! Built-in bindings.
//!
//! An immutable table consulted after the scope chain misses. The
//! interpreter owns a parallel table of values registered in the same
//! order, so a [`Binding::Builtin`](sepia_ir::Binding::Builtin) index means
//! the same thing to both.

use rustc_hash::FxHashMap;
use sepia_ir::{Name, Type};

#[derive(Clone, Debug, PartialEq)]
pub struct BuiltinEntry {
    pub name: Name,
    pub ty: Type,
}

#[derive(Clone, Debug, Default)]
pub struct Builtins {
    entries: Vec<BuiltinEntry>,
    by_name: FxHashMap<Name, usize>,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding and return its slot. A later registration under
    /// the same name shadows the earlier one.
    pub fn declare(&mut self, name: Name, ty: Type) -> usize {
        let index = self.entries.len();
        self.entries.push(BuiltinEntry { name, ty });
        self.by_name.insert(name, index);
        index
    }

    pub fn lookup(&self, name: Name) -> Option<(usize, &Type)> {
        let index = *self.by_name.get(&name)?;
        Some((index, &self.entries[index].ty))
    }

    pub fn get(&self, index: usize) -> Option<&BuiltinEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.by_name.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_defines_slots() {
        let mut builtins = Builtins::new();
        let print = Name::from_raw(40);
        let clock = Name::from_raw(41);
        assert_eq!(builtins.declare(print, Type::function(vec![Type::String], Type::Void)), 0);
        assert_eq!(builtins.declare(clock, Type::function(vec![], Type::Float)), 1);
        assert_eq!(builtins.lookup(clock).map(|(i, _)| i), Some(1));
        assert_eq!(builtins.get(0).map(|e| e.name), Some(print));
        assert!(builtins.lookup(Name::from_raw(99)).is_none());
        assert_eq!(builtins.len(), 2);
    }
}
