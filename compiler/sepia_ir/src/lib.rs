//! Shared data structures for the Sepia pipeline.
//!
//! - [`Span`] and [`Name`]/[`StringInterner`]: locations and identifiers
//! - [`Token`]/[`TokenList`]: the lexer's output
//! - [`ast`]: the syntax tree, with per-node [`ResolveSlot`]s
//! - [`Type`]/[`CallSignature`]: nominal type descriptors used by both the
//!   resolver and the evaluator

pub mod ast;
mod interner;
mod name;
mod resolve;
mod span;
mod token;
mod ty;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use resolve::{Binding, FunctionResolveInfo, ResolveInfo, ResolveSlot, StmtInfo};
pub use span::{Span, SpanError};
pub use token::{TemplatePart, Token, TokenKind, TokenList};
pub use ty::{CallSignature, Type};
