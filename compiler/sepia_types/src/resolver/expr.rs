//! Expression resolution.

use sepia_ir::ast::{BinaryOp, Expr, ExprKind, InterpolationPart};
use sepia_ir::{Binding, Name, ResolveInfo, Span, Type};
use sepia_stack::ensure_sufficient_stack;

use super::operators::{binary_result_type, unary_result_type};
use super::ResolvePass;
use crate::scope::ScopeInfo;
use crate::SemanticErrorKind;

impl ResolvePass<'_> {
    /// Resolve `expr`, record its annotation, and return its type.
    pub(super) fn resolve_expr(&mut self, expr: &Expr) -> Type {
        let info = ensure_sufficient_stack(|| self.resolve_expr_inner(expr));
        let ty = info.ty.clone();
        expr.info.set(info);
        ty
    }

    fn resolve_expr_inner(&mut self, expr: &Expr) -> ResolveInfo {
        match &expr.kind {
            ExprKind::Int(_) => ResolveInfo::typed(Type::Int),
            ExprKind::Float(_) => ResolveInfo::typed(Type::Float),
            ExprKind::Bool(_) => ResolveInfo::typed(Type::Bool),
            ExprKind::Str(_) => ResolveInfo::typed(Type::String),
            ExprKind::Null => ResolveInfo::typed(Type::Null),
            ExprKind::Interpolated(parts) => {
                for part in parts {
                    if let InterpolationPart::Expr(inner) = part {
                        self.resolve_expr(inner);
                    }
                }
                ResolveInfo::typed(Type::String)
            }
            ExprKind::Ident(name) => self.resolve_ident(*name, expr.span),
            ExprKind::Assign {
                target,
                target_span,
                op,
                value,
            } => self.resolve_assign(*target, *target_span, *op, value),
            ExprKind::Binary { op, left, right } => {
                let left_ty = self.resolve_expr(left);
                let right_ty = self.resolve_expr(right);
                let ty = binary_result_type(*op, &left_ty, &right_ty).unwrap_or_else(|| {
                    self.invalid_operands(*op, left_ty, right_ty, expr.span);
                    Type::Error
                });
                ResolveInfo::typed(ty)
            }
            ExprKind::Unary { op, operand } => {
                let found = self.resolve_expr(operand);
                let ty = unary_result_type(*op, &found).unwrap_or_else(|| {
                    self.error(
                        SemanticErrorKind::InvalidOperand {
                            op: op.as_symbol(),
                            found,
                        },
                        expr.span,
                    );
                    Type::Error
                });
                ResolveInfo::typed(ty)
            }
            ExprKind::Call { callee, args } => {
                ResolveInfo::typed(self.resolve_call(callee, args, expr.span))
            }
            ExprKind::Grouping(inner) => ResolveInfo::typed(self.resolve_expr(inner)),
            ExprKind::Function(decl) => ResolveInfo::typed(self.resolve_function(decl)),
        }
    }

    fn resolve_ident(&mut self, name: Name, span: Span) -> ResolveInfo {
        if let Some((info, steps, index)) = self.scopes.try_get(name) {
            return ResolveInfo {
                ty: info.ty.clone(),
                binding: Binding::Local { steps, index },
            };
        }
        if let Some((index, ty)) = self.builtins.lookup(name) {
            return ResolveInfo {
                ty: ty.clone(),
                binding: Binding::Builtin(index),
            };
        }
        self.undeclared(name, span);
        ResolveInfo::default()
    }

    fn resolve_assign(
        &mut self,
        target: Name,
        target_span: Span,
        op: Option<BinaryOp>,
        value: &Expr,
    ) -> ResolveInfo {
        let value_ty = self.resolve_expr(value);

        let Some((info, steps, index)) = self.scopes.try_get(target) else {
            if self.builtins.lookup(target).is_some() {
                self.error(
                    SemanticErrorKind::Unsupported {
                        what: "assignments to built-in functions",
                    },
                    target_span,
                );
            } else {
                self.undeclared(target, target_span);
            }
            return ResolveInfo::default();
        };
        let target_ty = info.ty.clone();

        let assigned_ty = match op {
            Some(op) => binary_result_type(op, &target_ty, &value_ty).unwrap_or_else(|| {
                self.invalid_operands(op, target_ty.clone(), value_ty.clone(), value.span);
                Type::Error
            }),
            None => value_ty,
        };
        self.expect_assignable(&target_ty, &assigned_ty, value.span);

        let updated = ScopeInfo::new(target, target_ty.clone(), true);
        if let Err(err) = self.scopes.update(target, steps, index, updated) {
            self.error(err.into(), target_span);
        }
        ResolveInfo {
            ty: target_ty,
            binding: Binding::Local { steps, index },
        }
    }

    fn resolve_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Type {
        let callee_ty = self.resolve_expr(callee);
        let arg_tys: Vec<Type> = args.iter().map(|arg| self.resolve_expr(arg)).collect();

        match &callee_ty {
            Type::Error => Type::Error,
            Type::Function(sig) => {
                if sig.arity() != args.len() {
                    self.error(
                        SemanticErrorKind::ArityMismatch {
                            expected: sig.arity(),
                            found: args.len(),
                        },
                        span,
                    );
                } else {
                    for ((param, found), arg) in sig.params.iter().zip(&arg_tys).zip(args) {
                        self.expect_assignable(param, found, arg.span);
                    }
                }
                sig.ret.clone()
            }
            other => {
                self.error(
                    SemanticErrorKind::NotCallable { ty: other.clone() },
                    callee.span,
                );
                Type::Error
            }
        }
    }

    fn invalid_operands(&mut self, op: BinaryOp, left: Type, right: Type, span: Span) {
        self.error(
            SemanticErrorKind::InvalidOperands {
                op: op.as_symbol(),
                left,
                right,
            },
            span,
        );
    }
}
