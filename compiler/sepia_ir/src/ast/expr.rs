//! Expression nodes.

use std::fmt;
use std::rc::Rc;

use super::{BinaryOp, FunctionDecl, UnaryOp};
use crate::{Name, ResolveInfo, ResolveSlot, Span};

/// An expression with its location and resolution slot.
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub info: ResolveSlot<ResolveInfo>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            info: ResolveSlot::default(),
        }
    }

    /// Resolved static type; `<error>` before resolution.
    pub fn ty(&self) -> crate::Type {
        self.info.with(|info| info.ty.clone())
    }
}

/// Expression variants.
pub enum ExprKind {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Name),
    Null,
    /// String literal with `${...}` segments.
    Interpolated(Vec<InterpolationPart>),
    Ident(Name),
    /// `target = value` or `target op= value`.
    Assign {
        target: Name,
        target_span: Span,
        op: Option<BinaryOp>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Grouping(Box<Expr>),
    /// Anonymous `func (...) { ... }`.
    Function(Rc<FunctionDecl>),
}

/// A piece of an interpolated string.
pub enum InterpolationPart {
    Text(String),
    Expr(Expr),
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Int(v) => write!(f, "Int({v})"),
            ExprKind::Float(v) => write!(f, "Float({v})"),
            ExprKind::Bool(v) => write!(f, "Bool({v})"),
            ExprKind::Str(name) => write!(f, "Str({name:?})"),
            ExprKind::Null => f.write_str("Null"),
            ExprKind::Interpolated(parts) => f.debug_tuple("Interpolated").field(parts).finish(),
            ExprKind::Ident(name) => write!(f, "Ident({name:?})"),
            ExprKind::Assign {
                target, op, value, ..
            } => f
                .debug_struct("Assign")
                .field("target", target)
                .field("op", op)
                .field("value", value)
                .finish(),
            ExprKind::Binary { op, left, right } => f
                .debug_struct("Binary")
                .field("op", op)
                .field("left", left)
                .field("right", right)
                .finish(),
            ExprKind::Unary { op, operand } => f
                .debug_struct("Unary")
                .field("op", op)
                .field("operand", operand)
                .finish(),
            ExprKind::Call { callee, args } => f
                .debug_struct("Call")
                .field("callee", callee)
                .field("args", args)
                .finish(),
            ExprKind::Grouping(inner) => f.debug_tuple("Grouping").field(inner).finish(),
            ExprKind::Function(decl) => f.debug_tuple("Function").field(decl).finish(),
        }
    }
}

impl fmt::Debug for InterpolationPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationPart::Text(text) => write!(f, "Text({text:?})"),
            InterpolationPart::Expr(expr) => write!(f, "Expr({expr:?})"),
        }
    }
}
