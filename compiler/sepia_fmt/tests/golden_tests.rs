//! Source in, canonical source out.

use pretty_assertions::assert_eq;
use sepia_fmt::format_program;
use sepia_ir::StringInterner;

fn format(source: &str) -> String {
    let interner = StringInterner::new();
    let lexed = sepia_lexer::lex(source, &interner);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let parsed = sepia_parse::parse(&lexed.tokens, &interner);
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    format_program(&parsed.program.stmts, &interner)
}

#[test]
fn functions_and_loops() {
    let source = r#"func fib(n:int):int{if(n<2){return n;}return fib(n-1)+fib(n-2);}
let s="a\n${fib(3)}";for(let i=0;i<3;i+=1)println("x");"#;
    let expected = r#"func fib(n: int): int {
    if (n < 2) {
        return n;
    }
    return fib(n - 1) + fib(n - 2);
}
let s = "a\n${fib(3)}";
for (let i = 0; i < 3; i += 1) println("x");
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn else_chains() {
    let source = "if (x) { a; } else if (y) b; else { c; }";
    let expected = "if (x) {\n    a;\n} else if (y) b;\nelse {\n    c;\n}\n";
    assert_eq!(format(source), expected);
}

#[test]
fn declarations_and_types() {
    let source = "let f: func(int, float): bool; let g: func(); let n: int = null; let m;";
    let expected = "let f: func(int, float): bool;\nlet g: func();\nlet n: int = null;\nlet m;\n";
    assert_eq!(format(source), expected);
}

#[test]
fn anonymous_functions_nest() {
    let source = "let add = func (a: int): func(int): int { \
                  return func (b: int): int { return a + b; }; };";
    let expected = "\
let add = func (a: int): func(int): int {
    return func (b: int): int {
        return a + b;
    };
};
";
    assert_eq!(format(source), expected);
}

#[test]
fn source_parentheses_are_kept() {
    assert_eq!(format("(1 + 2) * 3;"), "(1 + 2) * 3;\n");
    assert_eq!(format("x = y += (1);"), "x = y += (1);\n");
    assert_eq!(format("!(a && b) || -c < ~d;"), "!(a && b) || -c < ~d;\n");
}

#[test]
fn strings_are_re_escaped() {
    assert_eq!(
        format(r#"let s = "tab\t quote\" dollar\$ ${"inner"}";"#),
        "let s = \"tab\\t quote\\\" dollar\\$ ${\"inner\"}\";\n"
    );
}

#[test]
fn empty_blocks_and_for_headers() {
    assert_eq!(format("for(;;){}"), "for (;;) {}\n");
    assert_eq!(format("for (i = 0; ; ) { }"), "for (i = 0;;) {}\n");
    assert_eq!(format("while (true) { break; }"), "while (true) {\n    break;\n}\n");
}

#[test]
fn class_bodies_are_indented() {
    assert_eq!(
        format("class P { let x = 1; func get(): int { return x; } }"),
        "class P {\n    let x = 1;\n    func get(): int {\n        return x;\n    }\n}\n"
    );
}
