use pretty_assertions::assert_eq;
use sepia_diagnostic::ErrorCode;
use sepia_ir::{Span, StringInterner, TokenKind, TokenList};

use super::Cursor;

fn tokens(source: &str, interner: &StringInterner) -> TokenList {
    sepia_lexer::lex(source, interner).tokens
}

#[test]
fn test_advance_stops_at_eof() {
    let interner = StringInterner::new();
    let list = tokens("a", &interner);
    let mut cursor = Cursor::new(&list, &interner);
    assert!(cursor.check_ident());
    cursor.advance();
    assert!(cursor.is_at_end());
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_at_end());
    assert_eq!(cursor.position(), 1);
    assert_eq!(cursor.previous_span(), Span::new(0, 1));
}

#[test]
fn test_check_ignores_payload() {
    let interner = StringInterner::new();
    let list = tokens("42", &interner);
    let cursor = Cursor::new(&list, &interner);
    assert!(cursor.check(&TokenKind::Int(0)));
    assert_eq!(cursor.peek_kind_at(1), TokenKind::Eof);
    assert_eq!(cursor.peek_kind_at(5), TokenKind::Eof);
}

#[test]
fn test_expect_reports_found_token() {
    let interner = StringInterner::new();
    let list = tokens("let", &interner);
    let mut cursor = Cursor::new(&list, &interner);
    let Err(err) = cursor.expect(&TokenKind::Semicolon) else {
        panic!("`let` is not `;`");
    };
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected `;`, found `let`");
    assert_eq!(err.span, Span::new(0, 3));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_expect_ident() {
    let interner = StringInterner::new();
    let list = tokens("name 1", &interner);
    let mut cursor = Cursor::new(&list, &interner);
    let Ok((name, span)) = cursor.expect_ident() else {
        panic!("expected identifier");
    };
    assert_eq!(interner.lookup(name), "name");
    assert_eq!(span, Span::new(0, 4));
    let Err(err) = cursor.expect_ident() else {
        panic!("`1` is not an identifier");
    };
    assert_eq!(err.code, ErrorCode::E1004);
}

#[test]
fn test_eat() {
    let interner = StringInterner::new();
    let list = tokens(", x", &interner);
    let mut cursor = Cursor::new(&list, &interner);
    assert!(!cursor.eat(&TokenKind::Semicolon));
    assert!(cursor.eat(&TokenKind::Comma));
    assert!(cursor.check_ident());
}
