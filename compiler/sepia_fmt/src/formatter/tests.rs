use pretty_assertions::assert_eq;
use sepia_ir::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use sepia_ir::{Span, StringInterner};

use super::*;

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::DUMMY)
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn int(n: i64) -> Expr {
    expr(ExprKind::Int(n))
}

#[test]
fn parenthesises_looser_children() {
    let interner = StringInterner::new();
    // (1 + 2) * 3
    let tree = binary(BinaryOp::Mul, binary(BinaryOp::Add, int(1), int(2)), int(3));
    assert_eq!(format_expr(&tree, &interner), "(1 + 2) * 3");
    // 1 - (2 - 3)
    let tree = binary(BinaryOp::Sub, int(1), binary(BinaryOp::Sub, int(2), int(3)));
    assert_eq!(format_expr(&tree, &interner), "1 - (2 - 3)");
    // 1 - 2 - 3
    let tree = binary(BinaryOp::Sub, binary(BinaryOp::Sub, int(1), int(2)), int(3));
    assert_eq!(format_expr(&tree, &interner), "1 - 2 - 3");
}

#[test]
fn unary_operands() {
    let interner = StringInterner::new();
    let tree = expr(ExprKind::Unary {
        op: UnaryOp::Neg,
        operand: Box::new(binary(BinaryOp::Add, int(1), int(2))),
    });
    assert_eq!(format_expr(&tree, &interner), "-(1 + 2)");
}

#[test]
fn empty_program_formats_to_nothing() {
    let interner = StringInterner::new();
    assert_eq!(format_program(&[], &interner), "");
}

#[test]
fn loop_controls() {
    let interner = StringInterner::new();
    let body = Stmt::new(
        StmtKind::Block(vec![
            Stmt::new(StmtKind::Continue, Span::DUMMY),
            Stmt::new(StmtKind::Break, Span::DUMMY),
        ]),
        Span::DUMMY,
    );
    let program = vec![Stmt::new(
        StmtKind::While {
            cond: expr(ExprKind::Bool(true)),
            body: Box::new(body),
        },
        Span::DUMMY,
    )];
    assert_eq!(
        format_program(&program, &interner),
        "while (true) {\n    continue;\n    break;\n}\n"
    );
}
