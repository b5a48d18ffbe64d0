//! Formatting preserves meaning and is idempotent.

use proptest::prelude::*;
use sepia_eval::{silent_handler, EvalErrorKind, InterpreterBuilder};
use sepia_fmt::format_program;
use sepia_ir::ast::Program;
use sepia_ir::{SharedInterner, StringInterner};
use sepia_types::Resolver;

fn parse(source: &str, interner: &StringInterner) -> Program {
    let lexed = sepia_lexer::lex(source, interner);
    assert!(lexed.errors.is_empty(), "lex errors in {source:?}: {:?}", lexed.errors);
    let parsed = sepia_parse::parse(&lexed.tokens, interner);
    assert!(parsed.errors.is_empty(), "parse errors in {source:?}: {:?}", parsed.errors);
    parsed.program
}

fn format(source: &str) -> String {
    let interner = StringInterner::new();
    format_program(&parse(source, &interner).stmts, &interner)
}

/// The value a program evaluates to, in a comparable form.
fn evaluate(source: &str) -> Result<String, EvalErrorKind> {
    let interner = SharedInterner::new();
    let mut interp = InterpreterBuilder::new(interner.clone())
        .print_handler(silent_handler())
        .build();
    let program = parse(source, &interner);
    let errors = Resolver::new(interp.builtins()).resolve(&program, &interner);
    assert!(errors.is_empty(), "semantic errors in {source:?}: {errors:?}");
    // Debug output keeps NaN comparable.
    interp
        .execute(&program)
        .map(|value| format!("{value:?}"))
        .map_err(|err| err.kind)
}

fn arithmetic() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        (0u32..100).prop_map(|n| format!("{n}.5")),
        Just("x".to_owned()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "%"]),
                inner.clone(),
                any::<bool>(),
            )
                .prop_map(|(left, op, right, grouped)| if grouped {
                    format!("({left} {op} {right})")
                } else {
                    format!("{left} {op} {right}")
                }),
            inner.clone().prop_map(|operand| format!("-{operand}")),
            inner.prop_map(|operand| format!("({operand})")),
        ]
    })
}

proptest! {
    #[test]
    fn formatting_preserves_values(expr in arithmetic()) {
        let source = format!("let x = 7; {expr};");
        let formatted = format(&source);
        prop_assert_eq!(evaluate(&source), evaluate(&formatted));
    }

    #[test]
    fn formatting_is_idempotent(expr in arithmetic()) {
        let once = format(&format!("let x = 3; x += {expr};"));
        prop_assert_eq!(format(&once), once);
    }
}

const PROGRAMS: &[&str] = &[
    "func fib(n: int): int { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); } fib(12);",
    "let sum = 0; for (let i = 0; i < 10; i += 1) { if (i % 2 == 0) continue; sum += i; } sum;",
    "func make(): func(): int { let c = 0; return func (): int { c += 1; return c; }; } \
     let f = make(); f(); f();",
    r#"let n = 4; "n=${n * 2} ${n > 3}";"#,
    "let x; let y = x + 1; y == null;",
    "let a = 1; if (a > 2) if (a > 3) a = 10; else a = 20; a;",
    "false && 1 / 0 == 0 || !(2 < 1);",
];

#[test]
fn complete_programs_round_trip() {
    for source in PROGRAMS {
        let formatted = format(source);
        assert_eq!(evaluate(source), evaluate(&formatted), "{formatted}");
        assert_eq!(format(&formatted), formatted);
    }
}
