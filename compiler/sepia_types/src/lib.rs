//! Static analysis for Sepia.
//!
//! [`Resolver`] walks a parsed [`Program`](sepia_ir::ast::Program) once,
//! binding every identifier to a `(steps, index)` slot in the scope chain
//! or to a built-in, and checking types as it goes. The results are stored
//! in the AST's resolution slots for the evaluator to read.

mod builtins;
mod error;
mod resolver;
mod scope;

pub use builtins::{BuiltinEntry, Builtins};
pub use error::{SemanticError, SemanticErrorKind};
pub use resolver::Resolver;
pub use scope::{FrameKind, Scope, ScopeChain, ScopeError, ScopeInfo};
