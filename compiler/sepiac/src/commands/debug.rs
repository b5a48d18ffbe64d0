//! Debug commands: `lex` and `parse` for inspecting the frontend.

use std::fmt::Write as _;

use sepia_ir::ast::{Program, Stmt, StmtKind};
use sepia_ir::{SharedInterner, StringInterner, TokenKind, TokenList};

use crate::exit_code;

use super::{read_file, report, stderr_emitter, Options};

/// One line per token: kind and byte span. Identifiers and strings show
/// their text.
pub fn token_listing(tokens: &TokenList, interner: &StringInterner) -> String {
    let mut out = String::new();
    for token in tokens.iter() {
        let _ = match token.kind {
            TokenKind::Ident(name) => {
                writeln!(out, "  Ident({}) @ {}", interner.lookup(name), token.span)
            }
            TokenKind::String(name) => {
                writeln!(out, "  String({:?}) @ {}", interner.lookup(name), token.span)
            }
            kind => writeln!(out, "  {kind:?} @ {}", token.span),
        };
    }
    out
}

/// A summary of the top-level statements of `program`.
pub fn program_outline(program: &Program, interner: &StringInterner) -> String {
    let mut out = String::new();
    for stmt in &program.stmts {
        let _ = writeln!(out, "  {} @ {}", describe(stmt, interner), stmt.span);
    }
    out
}

fn describe(stmt: &Stmt, interner: &StringInterner) -> String {
    match &stmt.kind {
        StmtKind::Expr(_) => "expression".to_owned(),
        StmtKind::Let { name, .. } => format!("let {}", interner.lookup(*name)),
        StmtKind::Function(decl) => {
            let params: Vec<_> = decl
                .params
                .iter()
                .map(|param| interner.lookup(param.name))
                .collect();
            let name = decl.name.map_or("<anonymous>", |name| interner.lookup(name));
            format!("func {name}({})", params.join(", "))
        }
        StmtKind::Class { name, members } => {
            format!("class {} ({} members)", interner.lookup(*name), members.len())
        }
        StmtKind::Block(stmts) => format!("block ({} statements)", stmts.len()),
        StmtKind::If { .. } => "if".to_owned(),
        StmtKind::While { .. } => "while".to_owned(),
        StmtKind::For { .. } => "for".to_owned(),
        StmtKind::Break => "break".to_owned(),
        StmtKind::Continue => "continue".to_owned(),
        StmtKind::Return(_) => "return".to_owned(),
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str, options: Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let interner = SharedInterner::new();
    let lexed = sepia_lexer::lex(&source, &interner);

    println!("Tokens for '{path}' ({} tokens):", lexed.tokens.len());
    print!("{}", token_listing(&lexed.tokens, &interner));

    if lexed.errors.is_empty() {
        return exit_code::SUCCESS;
    }
    let diagnostics: Vec<_> = lexed
        .errors
        .into_iter()
        .map(sepia_lexer::LexError::into_diagnostic)
        .collect();
    report(&mut stderr_emitter(options.color, path, &source), &diagnostics);
    exit_code::FRONTEND_ERROR
}

/// Parse a file and display an outline of its statements.
pub fn parse_file(path: &str, options: Options) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(code) => return code,
    };
    let interner = SharedInterner::new();
    let checked = crate::session::parse_source(&source, &interner);

    println!("Parse result for '{path}':");
    println!("  Statements: {}", checked.program.stmts.len());
    println!("  Errors: {}", checked.diagnostics.len());
    if !checked.program.stmts.is_empty() {
        println!();
        println!("Statements:");
        print!("{}", program_outline(&checked.program, &interner));
    }

    if checked.diagnostics.is_empty() {
        return exit_code::SUCCESS;
    }
    report(&mut stderr_emitter(options.color, path, &source), &checked.diagnostics);
    exit_code::FRONTEND_ERROR
}
