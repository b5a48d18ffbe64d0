//! Expression rendering.
//!
//! A child is parenthesised when it binds looser than its position allows.
//! Binary operators are left associative, so a right operand at the same
//! precedence is parenthesised too. Source parentheses survive as
//! [`ExprKind::Grouping`] nodes.

use sepia_ir::ast::{Expr, ExprKind, InterpolationPart};
use sepia_lexer::escape_text;

use super::Formatter;
use crate::emitter::Emitter;

const ASSIGN_PRECEDENCE: u8 = 0;
const UNARY_PRECEDENCE: u8 = 11;
const CALL_PRECEDENCE: u8 = 12;
const ATOM_PRECEDENCE: u8 = 13;

fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assign { .. } => ASSIGN_PRECEDENCE,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Unary { .. } => UNARY_PRECEDENCE,
        ExprKind::Int(n) if *n < 0 => UNARY_PRECEDENCE,
        ExprKind::Float(x) if x.is_sign_negative() => UNARY_PRECEDENCE,
        ExprKind::Call { .. } => CALL_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

impl<E: Emitter> Formatter<'_, E> {
    pub(crate) fn emit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Int(n) => self.emitter.emit(&int_literal(*n)),
            ExprKind::Float(x) => self.emitter.emit(&float_literal(*x)),
            ExprKind::Bool(b) => self.emitter.emit(if *b { "true" } else { "false" }),
            ExprKind::Str(name) => {
                self.emitter.emit("\"");
                self.emitter.emit(&escape_text(self.interner.lookup(*name)));
                self.emitter.emit("\"");
            }
            ExprKind::Null => self.emitter.emit("null"),
            ExprKind::Interpolated(parts) => {
                self.emitter.emit("\"");
                for part in parts {
                    match part {
                        InterpolationPart::Text(text) => self.emitter.emit(&escape_text(text)),
                        InterpolationPart::Expr(inner) => {
                            self.emitter.emit("${");
                            self.emit_expr(inner);
                            self.emitter.emit("}");
                        }
                    }
                }
                self.emitter.emit("\"");
            }
            ExprKind::Ident(name) => self.emitter.emit(self.interner.lookup(*name)),
            ExprKind::Assign {
                target, op, value, ..
            } => {
                self.emitter.emit(self.interner.lookup(*target));
                self.emitter.emit(" ");
                if let Some(op) = op {
                    self.emitter.emit(op.as_symbol());
                }
                self.emitter.emit("= ");
                self.emit_operand(value, ASSIGN_PRECEDENCE);
            }
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.emit_operand(left, prec);
                self.emitter.emit(" ");
                self.emitter.emit(op.as_symbol());
                self.emitter.emit(" ");
                self.emit_operand(right, prec + 1);
            }
            ExprKind::Unary { op, operand } => {
                self.emitter.emit(op.as_symbol());
                self.emit_operand(operand, UNARY_PRECEDENCE);
            }
            ExprKind::Call { callee, args } => {
                self.emit_operand(callee, CALL_PRECEDENCE);
                self.emitter.emit("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.emitter.emit(", ");
                    }
                    self.emit_expr(arg);
                }
                self.emitter.emit(")");
            }
            ExprKind::Grouping(inner) => {
                self.emitter.emit("(");
                self.emit_expr(inner);
                self.emitter.emit(")");
            }
            ExprKind::Function(decl) => self.emit_function(decl),
        }
    }

    fn emit_operand(&mut self, expr: &Expr, min_precedence: u8) {
        if precedence(expr) < min_precedence {
            self.emitter.emit("(");
            self.emit_expr(expr);
            self.emitter.emit(")");
        } else {
            self.emit_expr(expr);
        }
    }
}

/// `i64::MIN` has no literal form; everything else prints as written.
fn int_literal(n: i64) -> String {
    if n == i64::MIN {
        format!("({} - 1)", i64::MIN + 1)
    } else {
        n.to_string()
    }
}

/// Always lexes back as a float: keeps a fractional part and spells out
/// non-finite values as divisions.
fn float_literal(x: f64) -> String {
    if x.is_nan() {
        return "(0.0 / 0.0)".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "(1.0 / 0.0)" } else { "(-1.0 / 0.0)" }.to_owned();
    }
    let text = format!("{x:?}");
    match text.find(['e', 'E']) {
        Some(exp) if !text[..exp].contains('.') => {
            format!("{}.0{}", &text[..exp], &text[exp..])
        }
        _ => text,
    }
}
