//! Statement execution and control flow.

use std::rc::Rc;

use sepia_ir::ast::{Expr, Stmt, StmtKind};
use sepia_ir::{Name, Type};
use sepia_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::environment::EnvError;
use crate::errors::type_mismatch;
use crate::{EvalError, EvalErrorKind, EvalResult, FunctionValue, Value};

/// How a statement finished.
///
/// `break`, `continue` and `return` travel outward as values rather than
/// as errors; loops and calls consume them.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Completed; carries the value of an expression statement.
    Normal(Value),
    Break,
    Continue,
    Return(Value),
}

impl Interpreter {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt)).map_err(|err| err.at(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Expr(expr) => Ok(Flow::Normal(self.eval_expr(expr)?)),
            StmtKind::Let { name, init, .. } => {
                self.exec_let(stmt, *name, init.as_ref())?;
                Ok(Flow::Normal(Value::Void))
            }
            StmtKind::Function(decl) => {
                let function =
                    FunctionValue::new(Rc::clone(decl), self.env.clone(), &self.interner);
                let value = Value::function(function);
                if let Some(name) = decl.name {
                    let expected = decl.info.with(|info| info.index);
                    let index = self.env.declare(name, value.ty(), value);
                    check_slot(name, expected, index)?;
                }
                Ok(Flow::Normal(Value::Void))
            }
            StmtKind::Class { .. } => Err(EvalErrorKind::Unsupported {
                what: "class declarations",
            }
            .into()),
            StmtKind::Block(stmts) => {
                let frame = self.env.child();
                self.with_frame(frame, |interp| interp.exec_stmts(stmts))
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(cond)? {
                    self.exec_body(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_body(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Void))
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval_condition(cond)? {
                    match self.exec_body(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal(_) | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal(Value::Void))
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                let header = self.env.child();
                self.with_frame(header, |interp| {
                    interp.exec_for(init.as_deref(), cond.as_ref(), post.as_ref(), body)
                })
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Void,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    fn exec_let(&mut self, stmt: &Stmt, name: Name, init: Option<&Expr>) -> EvalResult<()> {
        let info = stmt.info.get();
        let value = match init {
            Some(expr) => {
                let value = self.eval_expr(expr)?;
                if !info.ty.accepts(&value.ty()) {
                    return Err(type_mismatch(&info.ty, &value.ty()).at(expr.span));
                }
                value
            }
            None => Value::Null,
        };
        let index = self.env.declare(name, info.ty, value);
        check_slot(name, info.index, index)
    }

    /// Run statements in the current frame, stopping at the first abrupt
    /// completion.
    fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal(_) => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal(Value::Void))
    }

    /// A branch or loop body in a fresh frame. A block body shares that
    /// frame instead of opening its own.
    fn exec_body(&mut self, body: &Stmt) -> EvalResult<Flow> {
        let frame = self.env.child();
        match &body.kind {
            StmtKind::Block(stmts) => self.with_frame(frame, |interp| interp.exec_stmts(stmts)),
            _ => self.with_frame(frame, |interp| interp.exec_stmt(body)),
        }
    }

    /// Runs inside the loop's header frame. `post` follows a body that
    /// completed normally or hit `continue`.
    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        post: Option<&Expr>,
        body: &Stmt,
    ) -> EvalResult<Flow> {
        if let Some(init) = init {
            self.exec_stmt(init)?;
        }
        loop {
            if let Some(cond) = cond {
                if !self.eval_condition(cond)? {
                    break;
                }
            }
            match self.exec_body(body)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal(_) | Flow::Continue => {}
            }
            if let Some(post) = post {
                self.eval_expr(post)?;
            }
        }
        Ok(Flow::Normal(Value::Void))
    }

    /// Conditions must produce a bool; null is rejected like any other
    /// non-bool.
    fn eval_condition(&mut self, cond: &Expr) -> EvalResult<bool> {
        match self.eval_expr(cond)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch(&Type::Bool, &other.ty()).at(cond.span)),
        }
    }

    /// Run a function body in its activation frame. Falling off the end
    /// yields `void`.
    pub(crate) fn exec_function_body(
        &mut self,
        body: &[Stmt],
        frame: crate::Environment,
    ) -> EvalResult {
        self.with_frame(frame, |interp| match interp.exec_stmts(body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) | Flow::Break | Flow::Continue => Ok(Value::Void),
        })
    }
}

/// The runtime must land every declaration in the slot the resolver
/// assigned it.
fn check_slot(name: Name, expected: Option<usize>, found: usize) -> Result<(), EvalError> {
    match expected {
        Some(expected) if expected == found => Ok(()),
        Some(expected) => Err(EnvError::SlotMismatch {
            name,
            expected,
            found,
        }
        .into()),
        None => Err(EnvError::Unresolved { name }.into()),
    }
}
