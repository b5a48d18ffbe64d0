//! String interner shared by every phase of one session.
//!
//! Interned strings are leaked, which keeps `lookup` borrow-free: a REPL
//! session only ever interns the identifiers and literals it has seen.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Error when the interner runs out of 32-bit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternError {
    pub count: usize,
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "interner exceeded capacity after {} strings", self.count)
    }
}

impl std::error::Error for InternError {}

/// Maps strings to compact [`Name`]s and back.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner with the empty string and the language keywords
    /// already present.
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RwLock::new(InternTable::default()),
        };
        interner.intern("");
        for word in PRE_INTERNED {
            interner.intern(word);
        }
        interner
    }

    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().map.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        // Another caller may have won the race between the two locks.
        if let Some(&name) = table.map.get(s) {
            return Ok(name);
        }
        let raw = u32::try_from(table.strings.len()).map_err(|_| InternError {
            count: table.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_raw(raw);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern `s`, panicking only if more than `u32::MAX` strings exist.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Resolve a name back to its text.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

const PRE_INTERNED: &[&str] = &[
    "let", "func", "return", "if", "else", "while", "for", "break", "continue", "class", "true",
    "false", "null", "int", "float", "bool", "string", "void", "print", "println",
];

/// Reference-counted interner handle passed between the pipeline phases.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("counter");
        let b = interner.intern("total");
        assert_eq!(a, interner.intern("counter"));
        assert_ne!(a, b);
        assert_eq!(interner.lookup(a), "counter");
        assert_eq!(interner.lookup(b), "total");
    }

    #[test]
    fn empty_string_is_name_zero() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn shared_handles_see_the_same_table() {
        let interner = SharedInterner::new();
        let other = interner.clone();
        assert_eq!(interner.intern("shared"), other.intern("shared"));
    }

    #[test]
    fn unknown_name_resolves_to_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "");
    }
}
