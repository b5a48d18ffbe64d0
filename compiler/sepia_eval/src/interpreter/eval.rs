//! Expression evaluation.

use std::rc::Rc;

use sepia_ir::ast::{BinaryOp, Expr, ExprKind, InterpolationPart};
use sepia_ir::{Binding, Name, Type};
use sepia_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::environment::EnvError;
use crate::errors::type_mismatch;
use crate::{evaluate_binary, evaluate_unary, EvalResult, FunctionValue, Value};

impl Interpreter {
    /// Evaluate an expression. Errors without a location get this
    /// expression's span; inner spans take precedence.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr)).map_err(|err| err.at(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(x) => Ok(Value::Float(*x)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Str(name) => Ok(Value::from(self.interner.lookup(*name))),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Interpolated(parts) => {
                let mut text = String::new();
                for part in parts {
                    match part {
                        InterpolationPart::Text(literal) => text.push_str(literal),
                        InterpolationPart::Expr(inner) => {
                            text.push_str(&self.eval_expr(inner)?.to_string());
                        }
                    }
                }
                Ok(Value::from(text))
            }
            ExprKind::Ident(name) => self.lookup(*name, expr.info.with(|info| info.binding)),
            ExprKind::Assign {
                target, op, value, ..
            } => self.eval_assign(expr, *target, *op, value),
            ExprKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => self.eval_logical(*op, left, right),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                evaluate_binary(*op, left, right)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                evaluate_unary(*op, value)
            }
            ExprKind::Call { callee, args } => {
                let function = self.eval_expr(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call_value(&function, args, expr.span)
            }
            ExprKind::Grouping(inner) => self.eval_expr(inner),
            ExprKind::Function(decl) => Ok(Value::function(FunctionValue::new(
                Rc::clone(decl),
                self.env.clone(),
                &self.interner,
            ))),
        }
    }

    fn lookup(&self, name: Name, binding: Binding) -> EvalResult {
        match binding {
            Binding::Local { steps, index } => Ok(self.env.get(name, steps, index)?),
            Binding::Builtin(index) => self
                .natives
                .get(index)
                .cloned()
                .ok_or_else(|| EnvError::MissingBuiltin { index }.into()),
            Binding::Unresolved => Err(EnvError::Unresolved { name }.into()),
        }
    }

    /// `target = value` or `target op= value`. The stored value must fit
    /// the slot's declared type.
    fn eval_assign(
        &mut self,
        expr: &Expr,
        target: Name,
        op: Option<BinaryOp>,
        value: &Expr,
    ) -> EvalResult {
        let Binding::Local { steps, index } = expr.info.with(|info| info.binding) else {
            return Err(EnvError::Unresolved { name: target }.into());
        };
        // `x op= e` is `x = x op e`: the current value is read before `e` runs.
        let result = match op {
            Some(op) => {
                let current = self.env.get(target, steps, index)?;
                let rhs = self.eval_expr(value)?;
                evaluate_binary(op, current, rhs)?
            }
            None => self.eval_expr(value)?,
        };
        let slot_ty = self.env.slot_type(target, steps, index)?;
        if !slot_ty.accepts(&result.ty()) {
            return Err(type_mismatch(&slot_ty, &result.ty()).at(value.span));
        }
        self.env.update(target, steps, index, result.clone())?;
        Ok(result)
    }

    /// `&&` and `||` skip the right operand when the left decides the
    /// result. Both operands must be bools.
    fn eval_logical(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let decided = match self.eval_expr(left)? {
            Value::Bool(b) => b,
            other => return Err(type_mismatch(&Type::Bool, &other.ty()).at(left.span)),
        };
        if decided == (op == BinaryOp::Or) {
            return Ok(Value::Bool(decided));
        }
        match self.eval_expr(right)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(type_mismatch(&Type::Bool, &other.ty()).at(right.span)),
        }
    }
}
