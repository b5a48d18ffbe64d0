//! Abstract syntax tree.
//!
//! The tree is a closed set of enums; each pass matches exhaustively over
//! [`StmtKind`] and [`ExprKind`]. Nodes carry a [`Span`](crate::Span) and a
//! [`ResolveSlot`](crate::ResolveSlot) that resolution fills in.

mod expr;
mod operators;
mod stmt;

pub use expr::{Expr, ExprKind, InterpolationPart};
pub use operators::{BinaryOp, OpClass, UnaryOp};
pub use stmt::{FunctionDecl, Param, Stmt, StmtKind};

use crate::{Name, Span};

/// A type annotation as written in source, before name resolution.
#[derive(Clone, PartialEq, Debug)]
pub struct ParsedType {
    pub kind: ParsedTypeKind,
    pub span: Span,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ParsedTypeKind {
    /// `int`, `string`, ... or an unknown name the resolver will reject.
    Named(Name),
    /// `func(int, float): bool`; a missing return type means `void`.
    Function {
        params: Vec<ParsedType>,
        ret: Option<Box<ParsedType>>,
    },
}

/// A parsed compilation unit or REPL submission.
#[derive(Debug, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Program {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Program { stmts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_orders_families() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Shl.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::BitAnd.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
    }

    #[test]
    fn null_propagation_excludes_equality_and_logic() {
        assert!(BinaryOp::Add.propagates_null());
        assert!(BinaryOp::Lt.propagates_null());
        assert!(BinaryOp::Shr.propagates_null());
        assert!(!BinaryOp::Eq.propagates_null());
        assert!(!BinaryOp::And.propagates_null());
    }

    #[test]
    fn new_nodes_start_unresolved() {
        let expr = Expr::new(ExprKind::Int(1), Span::new(0, 1));
        assert!(expr.ty().is_error());
        let stmt = Stmt::new(StmtKind::Expr(expr), Span::new(0, 2));
        assert!(!stmt.always_returns());
    }
}
