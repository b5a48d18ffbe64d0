//! Static scope chain.
//!
//! A stack of frames mirroring the runtime environment chain. Each frame
//! maps a name to the list of slots declared under it, so redeclaring a
//! name in the same frame appends a new slot instead of replacing the old
//! one. Code resolved before the redeclaration keeps pointing at the
//! earlier slot.

use rustc_hash::FxHashMap;
use sepia_ir::{Name, Type};
use tracing::trace;

/// What the resolver knows about one declared slot.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeInfo {
    pub name: Name,
    pub ty: Type,
    /// Set by an initializer or a later assignment.
    pub initialized: bool,
}

impl ScopeInfo {
    pub fn new(name: Name, ty: Type, initialized: bool) -> Self {
        ScopeInfo {
            name,
            ty,
            initialized,
        }
    }
}

/// Why a frame is being pushed.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameKind {
    /// Block, branch or loop header: inherits loop and return context.
    Block,
    /// Loop body: `break` and `continue` become legal.
    Loop,
    /// Function body with its declared return type.
    Function(Type),
}

/// One lexical frame.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    slots: FxHashMap<Name, Vec<ScopeInfo>>,
    allow_loop_controls: bool,
    return_type: Option<Type>,
}

impl Scope {
    fn declare(&mut self, info: ScopeInfo) -> usize {
        let slots = self.slots.entry(info.name).or_default();
        slots.push(info);
        slots.len() - 1
    }

    /// Highest-index slot for `name` in this frame.
    fn latest(&self, name: Name) -> Option<(usize, &ScopeInfo)> {
        let slots = self.slots.get(&name)?;
        let index = slots.len().checked_sub(1)?;
        Some((index, &slots[index]))
    }
}

/// Invalid `(steps, index)` access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("no scope frame {steps} levels up")]
    MissingFrame { steps: usize },
    #[error("slot {index} of {name:?} does not exist {steps} frames up")]
    MissingSlot {
        name: Name,
        steps: usize,
        index: usize,
    },
}

/// The chain of frames, innermost last. A frame's parent is the frame
/// below it.
#[derive(Clone, Debug)]
pub struct ScopeChain {
    frames: Vec<Scope>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    /// A chain holding only the global frame.
    pub fn new() -> Self {
        ScopeChain {
            frames: vec![Scope::default()],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, kind: FrameKind) {
        let parent = self.innermost();
        let (allow_loop_controls, return_type) = match kind {
            FrameKind::Block => (parent.allow_loop_controls, parent.return_type.clone()),
            FrameKind::Loop => (true, parent.return_type.clone()),
            FrameKind::Function(ret) => (false, Some(ret)),
        };
        self.frames.push(Scope {
            slots: FxHashMap::default(),
            allow_loop_controls,
            return_type,
        });
        trace!(depth = self.frames.len(), "push scope");
    }

    /// Pop the innermost frame. The global frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
        trace!(depth = self.frames.len(), "pop scope");
    }

    fn innermost(&self) -> &Scope {
        // `frames` always holds the global frame.
        &self.frames[self.frames.len() - 1]
    }

    fn frame(&self, steps: usize) -> Result<&Scope, ScopeError> {
        self.frames
            .len()
            .checked_sub(steps + 1)
            .and_then(|i| self.frames.get(i))
            .ok_or(ScopeError::MissingFrame { steps })
    }

    /// Declare in the innermost frame, returning the slot index.
    pub fn declare(&mut self, info: ScopeInfo) -> usize {
        let last = self.frames.len() - 1;
        self.frames[last].declare(info)
    }

    /// Find the visible slot for `name`: `(info, steps, index)`.
    pub fn try_get(&self, name: Name) -> Option<(&ScopeInfo, usize, usize)> {
        self.frames
            .iter()
            .rev()
            .enumerate()
            .find_map(|(steps, frame)| {
                frame
                    .latest(name)
                    .map(|(index, info)| (info, steps, index))
            })
    }

    pub fn get(&self, name: Name, steps: usize, index: usize) -> Result<&ScopeInfo, ScopeError> {
        self.frame(steps)?
            .slots
            .get(&name)
            .and_then(|slots| slots.get(index))
            .ok_or(ScopeError::MissingSlot { name, steps, index })
    }

    pub fn update(
        &mut self,
        name: Name,
        steps: usize,
        index: usize,
        info: ScopeInfo,
    ) -> Result<(), ScopeError> {
        let frame_index = self
            .frames
            .len()
            .checked_sub(steps + 1)
            .ok_or(ScopeError::MissingFrame { steps })?;
        let slot = self.frames[frame_index]
            .slots
            .get_mut(&name)
            .and_then(|slots| slots.get_mut(index))
            .ok_or(ScopeError::MissingSlot { name, steps, index })?;
        *slot = info;
        Ok(())
    }

    pub fn allow_loop_controls(&self) -> bool {
        self.innermost().allow_loop_controls
    }

    /// Return type of the enclosing function, `None` at top level.
    pub fn return_type(&self) -> Option<&Type> {
        self.innermost().return_type.as_ref()
    }

    /// Every name visible from the innermost frame, for suggestions.
    pub fn visible_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.frames.iter().flat_map(|frame| frame.slots.keys().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info(name: Name, ty: Type) -> ScopeInfo {
        ScopeInfo::new(name, ty, true)
    }

    #[test]
    fn declare_appends_per_name() {
        let x = Name::from_raw(100);
        let mut chain = ScopeChain::new();
        assert_eq!(chain.declare(info(x, Type::Int)), 0);
        assert_eq!(chain.declare(info(x, Type::String)), 1);
        let (found, steps, index) = chain
            .try_get(x)
            .map(|(i, s, n)| (i.clone(), s, n))
            .unwrap_or_else(|| panic!("x is declared"));
        assert_eq!((found.ty, steps, index), (Type::String, 0, 1));
        assert_eq!(chain.get(x, 0, 0).map(|i| i.ty.clone()), Ok(Type::Int));
    }

    #[test]
    fn lookup_hops_outward() {
        let x = Name::from_raw(100);
        let y = Name::from_raw(101);
        let mut chain = ScopeChain::new();
        chain.declare(info(x, Type::Int));
        chain.push(FrameKind::Block);
        chain.push(FrameKind::Block);
        chain.declare(info(y, Type::Bool));
        assert_eq!(chain.try_get(x).map(|(_, s, i)| (s, i)), Some((2, 0)));
        assert_eq!(chain.try_get(y).map(|(_, s, i)| (s, i)), Some((0, 0)));
        chain.pop();
        assert!(chain.try_get(y).is_none());
        assert_eq!(chain.depth(), 2);
    }

    #[test]
    fn update_replaces_slot() {
        let x = Name::from_raw(100);
        let mut chain = ScopeChain::new();
        chain.declare(ScopeInfo::new(x, Type::Int, false));
        chain.push(FrameKind::Block);
        assert_eq!(chain.update(x, 1, 0, info(x, Type::Int)), Ok(()));
        assert_eq!(chain.get(x, 1, 0).map(|i| i.initialized), Ok(true));
        assert_eq!(
            chain.update(x, 0, 0, info(x, Type::Int)),
            Err(ScopeError::MissingSlot {
                name: x,
                steps: 0,
                index: 0
            })
        );
        assert_eq!(
            chain.get(x, 5, 0).map(|i| i.ty.clone()),
            Err(ScopeError::MissingFrame { steps: 5 })
        );
    }

    #[test]
    fn loop_and_return_context() {
        let mut chain = ScopeChain::new();
        assert!(!chain.allow_loop_controls());
        assert_eq!(chain.return_type(), None);
        chain.push(FrameKind::Function(Type::Int));
        chain.push(FrameKind::Loop);
        chain.push(FrameKind::Block);
        assert!(chain.allow_loop_controls());
        assert_eq!(chain.return_type(), Some(&Type::Int));
        chain.push(FrameKind::Function(Type::Void));
        assert!(!chain.allow_loop_controls());
        assert_eq!(chain.return_type(), Some(&Type::Void));
    }

    #[test]
    fn global_frame_is_never_popped() {
        let mut chain = ScopeChain::new();
        chain.pop();
        chain.pop();
        assert_eq!(chain.depth(), 1);
    }

    #[test]
    fn clone_is_independent() {
        let x = Name::from_raw(100);
        let mut chain = ScopeChain::new();
        let snapshot = chain.clone();
        chain.declare(info(x, Type::Int));
        assert!(snapshot.try_get(x).is_none());
        assert!(chain.try_get(x).is_some());
    }
}
