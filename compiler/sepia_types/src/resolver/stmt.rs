//! Statement resolution.

use sepia_ir::ast::{Expr, ParsedType, Stmt, StmtKind};
use sepia_ir::{Name, Span, StmtInfo, Type};
use sepia_stack::ensure_sufficient_stack;

use super::ResolvePass;
use crate::scope::{FrameKind, ScopeInfo};
use crate::SemanticErrorKind;

impl ResolvePass<'_> {
    pub(super) fn resolve_stmt(&mut self, stmt: &Stmt) {
        ensure_sufficient_stack(|| self.resolve_stmt_inner(stmt));
    }

    fn resolve_stmt_inner(&mut self, stmt: &Stmt) {
        let always_returns = match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.resolve_expr(expr);
                false
            }
            StmtKind::Let {
                name,
                name_span,
                ty,
                init,
            } => {
                self.resolve_let(stmt, *name, *name_span, ty.as_ref(), init.as_ref());
                return;
            }
            StmtKind::Function(decl) => {
                self.resolve_function(decl);
                false
            }
            StmtKind::Class { .. } => {
                self.error(
                    SemanticErrorKind::Unsupported {
                        what: "class declarations",
                    },
                    stmt.span,
                );
                false
            }
            StmtKind::Block(stmts) => {
                self.scopes.push(FrameKind::Block);
                let returns = self.resolve_stmts(stmts);
                self.scopes.pop();
                returns
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_condition(cond);
                let then_returns = self.resolve_body(then_branch, FrameKind::Block);
                let else_returns = else_branch
                    .as_ref()
                    .is_some_and(|branch| self.resolve_body(branch, FrameKind::Block));
                then_returns && else_returns
            }
            StmtKind::While { cond, body } => {
                self.resolve_condition(cond);
                self.resolve_body(body, FrameKind::Loop);
                false
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                // Header frame holding the initializer.
                self.scopes.push(FrameKind::Block);
                if let Some(init) = init {
                    self.resolve_stmt(init);
                }
                if let Some(cond) = cond {
                    self.resolve_condition(cond);
                }
                self.resolve_body(body, FrameKind::Loop);
                if let Some(post) = post {
                    self.resolve_expr(post);
                }
                self.scopes.pop();
                false
            }
            StmtKind::Break | StmtKind::Continue => {
                if !self.scopes.allow_loop_controls() {
                    let keyword = if matches!(stmt.kind, StmtKind::Break) {
                        "break"
                    } else {
                        "continue"
                    };
                    self.error(SemanticErrorKind::LoopControlOutsideLoop { keyword }, stmt.span);
                }
                false
            }
            StmtKind::Return(value) => {
                self.resolve_return(value.as_ref(), stmt.span);
                true
            }
        };
        stmt.info.set(StmtInfo {
            always_returns,
            ..StmtInfo::default()
        });
    }

    /// Resolve statements in the current frame. True if any of them always
    /// returns.
    pub(super) fn resolve_stmts(&mut self, stmts: &[Stmt]) -> bool {
        let mut returns = false;
        for stmt in stmts {
            self.resolve_stmt(stmt);
            returns |= stmt.always_returns();
        }
        returns
    }

    /// Resolve a branch or loop body in a frame of its own; a block body
    /// uses that frame directly.
    fn resolve_body(&mut self, body: &Stmt, kind: FrameKind) -> bool {
        self.scopes.push(kind);
        let returns = if let StmtKind::Block(stmts) = &body.kind {
            let returns = self.resolve_stmts(stmts);
            body.info.set(StmtInfo {
                always_returns: returns,
                ..StmtInfo::default()
            });
            returns
        } else {
            self.resolve_stmt(body);
            body.always_returns()
        };
        self.scopes.pop();
        returns
    }

    fn resolve_condition(&mut self, cond: &Expr) {
        let ty = self.resolve_expr(cond);
        self.expect_assignable(&Type::Bool, &ty, cond.span);
    }

    fn resolve_let(
        &mut self,
        stmt: &Stmt,
        name: Name,
        name_span: Span,
        annotation: Option<&ParsedType>,
        init: Option<&Expr>,
    ) {
        let declared = annotation.map(|ty| self.resolve_type(ty));
        // The initializer cannot see the name it initializes.
        let init_ty = init.map(|expr| (self.resolve_expr(expr), expr.span));

        let ty = match (declared, init_ty) {
            (Some(declared), Some((found, span))) => {
                self.expect_assignable(&declared, &found, span);
                declared
            }
            (Some(declared), None) => declared,
            (None, Some((Type::Void, _))) => {
                self.error(
                    SemanticErrorKind::AmbiguousType {
                        name: self.interner.lookup(name).to_owned(),
                    },
                    name_span,
                );
                Type::Error
            }
            (None, Some((found, _))) => found,
            (None, None) => Type::Null,
        };

        let index = self
            .scopes
            .declare(ScopeInfo::new(name, ty.clone(), init.is_some()));
        stmt.info.set(StmtInfo {
            always_returns: false,
            ty,
            index: Some(index),
        });
    }

    fn resolve_return(&mut self, value: Option<&Expr>, span: Span) {
        let found = match value {
            Some(expr) => self.resolve_expr(expr),
            None => Type::Void,
        };
        let Some(expected) = self.scopes.return_type().cloned() else {
            self.error(SemanticErrorKind::ReturnOutsideFunction, span);
            return;
        };
        let matches = match (&expected, &found) {
            (Type::Void, Type::Void) => true,
            // Every non-void slot is nullable; `void` is not a value.
            (Type::Void, other) | (other, Type::Void) => other.is_error(),
            (expected, found) => expected.accepts(found),
        };
        if !matches {
            let at = value.map_or(span, |expr| expr.span);
            self.error(SemanticErrorKind::ReturnTypeMismatch { expected, found }, at);
        }
    }
}
