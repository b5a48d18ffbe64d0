use std::rc::Rc;

use pretty_assertions::assert_eq;
use sepia_diagnostic::ErrorCode;
use sepia_ir::ast::{Expr, ExprKind, Program, Stmt, StmtKind};
use sepia_ir::{Binding, StringInterner, Type};

use crate::{Builtins, Resolver, SemanticError, SemanticErrorKind};

fn test_builtins(interner: &StringInterner) -> Rc<Builtins> {
    let mut builtins = Builtins::new();
    builtins.declare(
        interner.intern("println"),
        Type::function(vec![Type::String], Type::Void),
    );
    builtins.declare(
        interner.intern("sqrt"),
        Type::function(vec![Type::Float], Type::Float),
    );
    Rc::new(builtins)
}

fn parse(source: &str, interner: &StringInterner) -> Program {
    let lexed = sepia_lexer::lex(source, interner);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let parsed = sepia_parse::parse(&lexed.tokens, interner);
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    parsed.program
}

fn check(source: &str) -> (Program, Vec<SemanticError>) {
    let interner = StringInterner::new();
    let program = parse(source, &interner);
    let mut resolver = Resolver::new(test_builtins(&interner));
    let errors = resolver.resolve(&program, &interner);
    (program, errors)
}

fn codes(source: &str) -> Vec<ErrorCode> {
    check(source).1.iter().map(SemanticError::code).collect()
}

fn block(stmt: &Stmt) -> &[Stmt] {
    match &stmt.kind {
        StmtKind::Block(stmts) => stmts,
        other => panic!("expected block, found {other:?}"),
    }
}

fn expr(stmt: &Stmt) -> &Expr {
    match &stmt.kind {
        StmtKind::Expr(expr) => expr,
        StmtKind::Let {
            init: Some(init), ..
        } => init,
        StmtKind::Return(Some(value)) => value,
        other => panic!("expected expression, found {other:?}"),
    }
}

fn binding(expr: &Expr) -> Binding {
    expr.info.with(|info| info.binding)
}

#[test]
fn bindings_count_frames_outward() {
    let (program, errors) = check("let a = 1; { let b = a; { b + a; } }");
    assert_eq!(errors, vec![]);
    let outer = block(&program.stmts[1]);
    assert_eq!(binding(expr(&outer[0])), Binding::Local { steps: 1, index: 0 });
    let ExprKind::Binary { left, right, .. } = &expr(&block(&outer[1])[0]).kind else {
        panic!("expected binary expression");
    };
    assert_eq!(binding(left), Binding::Local { steps: 1, index: 0 });
    assert_eq!(binding(right), Binding::Local { steps: 2, index: 0 });
    assert_eq!(left.ty(), Type::Int);
}

#[test]
fn redeclaration_appends_a_slot() {
    let (program, errors) = check(r#"let x = 1; func f(): int { return x; } let x = "s"; x;"#);
    assert_eq!(errors, vec![]);
    let StmtKind::Function(decl) = &program.stmts[1].kind else {
        panic!("expected function");
    };
    let returned = expr(&decl.body[0]);
    assert_eq!(binding(returned), Binding::Local { steps: 1, index: 0 });
    assert_eq!(returned.ty(), Type::Int);
    assert_eq!(program.stmts[2].info.get().index, Some(1));
    assert_eq!(binding(expr(&program.stmts[3])), Binding::Local { steps: 0, index: 1 });
    assert_eq!(expr(&program.stmts[3]).ty(), Type::String);
}

#[test]
fn initializer_does_not_see_its_own_name() {
    assert_eq!(codes("let y = y;"), vec![ErrorCode::E2003]);
    assert_eq!(codes("let y = 1; { let y = y + 1; }"), vec![]);
}

#[test]
fn named_functions_can_recurse() {
    let source = "func fact(n: int): int { if (n <= 1) { return 1; } return n * fact(n - 1); }";
    assert_eq!(codes(source), vec![]);
}

#[test]
fn function_slots_are_recorded() {
    let (program, errors) = check("func f(a: int, b: float): float { return a + b; }");
    assert_eq!(errors, vec![]);
    let StmtKind::Function(decl) = &program.stmts[0].kind else {
        panic!("expected function");
    };
    let info = decl.info.get();
    assert_eq!(info.index, Some(0));
    assert_eq!(info.param_indices, vec![0, 0]);
    assert_eq!(info.ty().name(), "func(int, float): float");
}

#[test]
fn closures_bind_through_the_declaring_frame() {
    let source = "func outer(): func(): int { \
                  let n = 1; func inner(): int { return n; } return inner; }";
    let (program, errors) = check(source);
    assert_eq!(errors, vec![]);
    let StmtKind::Function(outer) = &program.stmts[0].kind else {
        panic!("expected function");
    };
    let StmtKind::Function(inner) = &outer.body[1].kind else {
        panic!("expected nested function");
    };
    assert_eq!(binding(expr(&inner.body[0])), Binding::Local { steps: 1, index: 0 });
}

#[test]
fn missing_return_only_when_a_path_falls_through() {
    assert_eq!(
        codes("func a(x: int): int { if (x > 0) { return 1; } else { return 2; } }"),
        vec![]
    );
    assert_eq!(
        codes("func b(x: int): int { if (x > 0) { return 1; } }"),
        vec![ErrorCode::E2008]
    );
    assert_eq!(codes("func c(): int { { return 1; } }"), vec![]);
    assert_eq!(codes("func d(): int { return 1; println(\"dead\"); }"), vec![]);
    assert_eq!(codes("func e(): int { while (true) { return 1; } }"), vec![ErrorCode::E2008]);
    assert_eq!(codes("func f() { }"), vec![]);
}

#[test]
fn missing_return_names_the_function() {
    let (_, errors) = check("let g = func (): int { };");
    assert_eq!(
        errors[0].kind.to_string(),
        "anonymous function does not return a value on every path"
    );
    let (_, errors) = check("func h(): bool { }");
    assert_eq!(
        errors[0].kind.to_string(),
        "function `h` does not return a value on every path"
    );
}

#[test]
fn uninitialized_let_is_null_typed() {
    let (program, errors) = check("let x; x + 1;");
    assert_eq!(errors, vec![]);
    assert_eq!(program.stmts[0].info.get().ty, Type::Null);
    assert_eq!(expr(&program.stmts[1]).ty(), Type::Null);
}

#[test]
fn annotated_let_without_initializer_keeps_its_type() {
    let (program, errors) = check("let x: int; x = 4;");
    assert_eq!(errors, vec![]);
    assert_eq!(program.stmts[0].info.get().ty, Type::Int);
}

#[test]
fn null_arithmetic_is_null() {
    let (program, errors) = check("let n = null * 2;");
    assert_eq!(errors, vec![]);
    assert_eq!(program.stmts[0].info.get().ty, Type::Null);
}

#[test]
fn loop_controls_need_an_enclosing_loop() {
    assert_eq!(codes("break;"), vec![ErrorCode::E2010]);
    assert_eq!(codes("while (true) { if (true) { continue; } break; }"), vec![]);
    assert_eq!(
        codes("while (true) { func f() { break; } }"),
        vec![ErrorCode::E2010]
    );
    assert_eq!(codes("for (;;) break;"), vec![]);
}

#[test]
fn return_outside_function() {
    assert_eq!(codes("return 1;"), vec![ErrorCode::E2009]);
    assert_eq!(codes("{ return; }"), vec![ErrorCode::E2009]);
}

#[test]
fn return_type_checks() {
    assert_eq!(codes(r#"func f(): int { return "s"; }"#), vec![ErrorCode::E2007]);
    assert_eq!(codes("func g() { return 1; }"), vec![ErrorCode::E2007]);
    assert_eq!(codes("func h(): int { return; }"), vec![ErrorCode::E2007]);
    assert_eq!(codes("func i(): string { return null; }"), vec![]);
    assert_eq!(codes("func j() { return; }"), vec![]);
}

#[test]
fn declaration_type_mismatch() {
    assert_eq!(codes("let s: string = 1;"), vec![ErrorCode::E2001]);
    assert_eq!(codes("let f: float = 1;"), vec![ErrorCode::E2001]);
    assert_eq!(codes("let f: float = null;"), vec![]);
}

#[test]
fn void_initializer_is_ambiguous() {
    assert_eq!(codes("func f() { } let v = f();"), vec![ErrorCode::E2005]);
    assert_eq!(codes(r#"let v = println("x");"#), vec![ErrorCode::E2005]);
}

#[test]
fn calls_check_arity_and_arguments() {
    assert_eq!(codes("sqrt(1.0, 2.0);"), vec![ErrorCode::E2004]);
    assert_eq!(codes("sqrt(2);"), vec![ErrorCode::E2001]);
    assert_eq!(codes("let n = 3; n();"), vec![ErrorCode::E2006]);
    let (program, errors) = check("let r = sqrt(2.0);");
    assert_eq!(errors, vec![]);
    assert_eq!(program.stmts[0].info.get().ty, Type::Float);
}

#[test]
fn builtins_bind_by_table_index() {
    let (program, errors) = check(r#"println("hi"); sqrt(4.0);"#);
    assert_eq!(errors, vec![]);
    let callee = |stmt: &Stmt| match &expr(stmt).kind {
        ExprKind::Call { callee, .. } => binding(callee),
        other => panic!("expected call, found {other:?}"),
    };
    assert_eq!(callee(&program.stmts[0]), Binding::Builtin(0));
    assert_eq!(callee(&program.stmts[1]), Binding::Builtin(1));
}

#[test]
fn locals_shadow_builtins() {
    let (program, errors) = check("let sqrt = 2; sqrt;");
    assert_eq!(errors, vec![]);
    assert_eq!(binding(expr(&program.stmts[1])), Binding::Local { steps: 0, index: 0 });
}

#[test]
fn assigning_to_a_builtin_is_unsupported() {
    assert_eq!(codes("println = 1;"), vec![ErrorCode::E2012]);
}

#[test]
fn unknown_type_suggests_a_builtin_type() {
    let (_, errors) = check(r#"let s: strng = "a";"#);
    assert_eq!(
        errors[0].kind,
        SemanticErrorKind::UnknownType {
            name: "strng".into(),
            suggestion: Some("string".into()),
        }
    );
}

#[test]
fn undeclared_identifier_suggests_a_visible_name() {
    let (_, errors) = check("let count = 0; cuont;");
    assert_eq!(
        errors[0].kind,
        SemanticErrorKind::UndeclaredIdentifier {
            name: "cuont".into(),
            suggestion: Some("count".into()),
        }
    );
}

#[test]
fn classes_are_rejected() {
    assert_eq!(codes("class Point { let x = 1; }"), vec![ErrorCode::E2012]);
}

#[test]
fn operator_errors() {
    assert_eq!(codes(r#"let s = "a"; s -= 1;"#), vec![ErrorCode::E2011]);
    assert_eq!(codes("-true;"), vec![ErrorCode::E2011]);
    assert_eq!(codes("1 && true;"), vec![ErrorCode::E2011]);
    assert_eq!(codes("let i = 1; i += 2.5;"), vec![ErrorCode::E2001]);
}

#[test]
fn conditions_must_be_bool() {
    assert_eq!(codes("if (1) { }"), vec![ErrorCode::E2001]);
    assert_eq!(codes("while (null) { }"), vec![]);
}

#[test]
fn for_header_has_its_own_frame() {
    let (program, errors) = check("for (let i = 0; i < 3; i += 1) { let j = i; }");
    assert_eq!(errors, vec![]);
    let StmtKind::For { post, body, .. } = &program.stmts[0].kind else {
        panic!("expected for");
    };
    assert_eq!(binding(expr(&block(body)[0])), Binding::Local { steps: 1, index: 0 });
    let post = post.as_ref().map(binding);
    assert_eq!(post, Some(Binding::Local { steps: 0, index: 0 }));
}

#[test]
fn for_variable_is_scoped_to_the_loop() {
    assert_eq!(codes("for (let i = 0; i < 3; i += 1) { } i;"), vec![ErrorCode::E2003]);
}

#[test]
fn errors_do_not_stop_resolution() {
    assert_eq!(
        codes(r#"let a = b; let c: int = "x"; a + 1;"#),
        vec![ErrorCode::E2003, ErrorCode::E2001]
    );
}

#[test]
fn cloned_resolver_is_independent() {
    let interner = StringInterner::new();
    let mut resolver = Resolver::new(test_builtins(&interner));
    assert_eq!(resolver.resolve(&parse("let a = 1;", &interner), &interner), vec![]);

    let mut speculative = resolver.clone();
    assert_eq!(speculative.resolve(&parse("let b = a;", &interner), &interner), vec![]);

    let errors = resolver.resolve(&parse("b;", &interner), &interner);
    assert_eq!(errors.iter().map(SemanticError::code).collect::<Vec<_>>(), vec![ErrorCode::E2003]);
    assert_eq!(speculative.resolve(&parse("b;", &interner), &interner), vec![]);
    assert_eq!(resolver.scopes().depth(), 1);
}
