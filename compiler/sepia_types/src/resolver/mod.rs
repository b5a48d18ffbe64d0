//! Name resolution and static type checking.
//!
//! A single walk over the AST that fills every node's resolution slot:
//! expression types, `(steps, index)` bindings for identifiers, slot
//! indices for declarations, function signatures and the always-returns
//! flag of statements. Errors are collected; resolution never stops early.
//!
//! The resolver's frames are congruent with the evaluator's environment
//! frames, so a binding computed here addresses the right runtime slot:
//! - top-level statements live in the global frame;
//! - every block, branch, loop body and loop header gets one frame;
//!   a block used as a branch or loop body shares that frame;
//! - parameters and the body of a function share the activation frame.

mod expr;
mod function;
mod operators;
mod stmt;

use std::rc::Rc;

use sepia_ir::ast::{ParsedType, ParsedTypeKind, Program};
use sepia_ir::{Name, Span, StringInterner, Type};
use tracing::debug;

use crate::error::closest_match;
use crate::{Builtins, ScopeChain, SemanticError, SemanticErrorKind};

const TYPE_NAMES: [&str; 6] = ["int", "float", "bool", "string", "void", "null"];

/// Persistent resolver state: the scope chain and the built-in table.
///
/// Cloning deep-copies the scope chain and shares the built-ins, which is
/// how the REPL resolves a submission speculatively.
#[derive(Clone, Debug)]
pub struct Resolver {
    scopes: ScopeChain,
    builtins: Rc<Builtins>,
}

impl Resolver {
    pub fn new(builtins: Rc<Builtins>) -> Self {
        Resolver {
            scopes: ScopeChain::new(),
            builtins,
        }
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn builtins(&self) -> &Rc<Builtins> {
        &self.builtins
    }

    /// Resolve `program` into the current global frame.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn resolve(&mut self, program: &Program, interner: &StringInterner) -> Vec<SemanticError> {
        let mut pass = ResolvePass {
            scopes: &mut self.scopes,
            builtins: &self.builtins,
            interner,
            errors: Vec::new(),
        };
        for stmt in &program.stmts {
            pass.resolve_stmt(stmt);
        }
        debug!(
            statements = program.stmts.len(),
            errors = pass.errors.len(),
            "resolved program"
        );
        pass.errors
    }
}

/// State for one call to [`Resolver::resolve`].
struct ResolvePass<'a> {
    scopes: &'a mut ScopeChain,
    builtins: &'a Builtins,
    interner: &'a StringInterner,
    errors: Vec<SemanticError>,
}

impl ResolvePass<'_> {
    fn error(&mut self, kind: SemanticErrorKind, span: Span) {
        self.errors.push(SemanticError::new(kind, span));
    }

    /// Report a type mismatch unless `expected` accepts `found`.
    fn expect_assignable(&mut self, expected: &Type, found: &Type, span: Span) {
        if !expected.accepts(found) {
            self.error(
                SemanticErrorKind::TypeMismatch {
                    expected: expected.clone(),
                    found: found.clone(),
                },
                span,
            );
        }
    }

    fn resolve_type(&mut self, parsed: &ParsedType) -> Type {
        match &parsed.kind {
            ParsedTypeKind::Named(name) => {
                let text = self.interner.lookup(*name);
                if let Some(ty) = Type::from_name(text) {
                    return ty;
                }
                let suggestion = closest_match(text, TYPE_NAMES).map(str::to_owned);
                self.error(
                    SemanticErrorKind::UnknownType {
                        name: text.to_owned(),
                        suggestion,
                    },
                    parsed.span,
                );
                Type::Error
            }
            ParsedTypeKind::Function { params, ret } => {
                let params = params.iter().map(|p| self.resolve_type(p)).collect();
                let ret = match ret {
                    Some(ret) => self.resolve_type(ret),
                    None => Type::Void,
                };
                Type::function(params, ret)
            }
        }
    }

    fn undeclared(&mut self, name: Name, span: Span) {
        let text = self.interner.lookup(name);
        let candidates: Vec<&'static str> = self
            .scopes
            .visible_names()
            .chain(self.builtins.names())
            .map(|n| self.interner.lookup(n))
            .collect();
        let suggestion = closest_match(text, candidates).map(str::to_owned);
        self.error(
            SemanticErrorKind::UndeclaredIdentifier {
                name: text.to_owned(),
                suggestion,
            },
            span,
        );
    }
}

#[cfg(test)]
mod tests;
