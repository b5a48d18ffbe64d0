use super::*;
use pretty_assertions::assert_eq;

fn undeclared() -> Diagnostic {
    Diagnostic::error(ErrorCode::E2003)
        .with_message("undeclared identifier `count`")
        .with_label(Span::new(20, 25), "not found in this scope")
        .with_secondary_label(Span::new(4, 9), "a similar name is declared here")
        .with_suggestion("did you mean `counter`?")
}

#[test]
fn builder_collects_every_part() {
    let diag = undeclared().with_note("names are resolved before the program runs");

    assert_eq!(diag.code, ErrorCode::E2003);
    assert!(diag.is_error());
    assert_eq!(
        diag.labels.iter().map(|l| l.style).collect::<Vec<_>>(),
        vec![LabelStyle::Primary, LabelStyle::Secondary]
    );
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions, vec!["did you mean `counter`?".to_owned()]);
}

#[test]
fn primary_span_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E6001)
        .with_secondary_label(Span::new(0, 3), "in call to `f`")
        .with_label(Span::new(8, 13), "evaluation failed here");
    assert_eq!(diag.primary_span(), Some(Span::new(8, 13)));
}

#[test]
fn warnings_are_not_errors() {
    let diag = Diagnostic::warning(ErrorCode::E2012).with_message("ignored");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn display_is_one_block() {
    assert_eq!(
        undeclared().to_string(),
        "error[E2003]: undeclared identifier `count`\n\
         \x20 at 20..25: not found in this scope\n\
         \x20    4..9: a similar name is declared here\n\
         \x20 = help: did you mean `counter`?"
    );
}
