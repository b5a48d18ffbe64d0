//! Sub-lexer for string literals.
//!
//! A string literal is scanned in two steps. While tokenizing, [`scan_string`]
//! only finds where the literal ends, skipping over `${...}` segments so that
//! quotes and braces inside them do not terminate it early. Afterwards
//! [`split_template`] processes escapes and cuts the body into text and code
//! parts; the parser re-lexes each code part as an expression.

use sepia_ir::{Span, TemplatePart};

use crate::{LexError, LexErrorKind};

/// Length in bytes of a string literal body plus its closing quote.
///
/// `rest` starts just after the opening quote.
pub(crate) fn scan_string(rest: &[u8]) -> Result<usize, LexErrorKind> {
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i + 1),
            b'$' if rest.get(i + 1) == Some(&b'{') => {
                i = segment_end(rest, i + 2).ok_or(LexErrorKind::UnterminatedInterpolation)? + 1;
            }
            _ => i += 1,
        }
    }
    Err(LexErrorKind::UnterminatedString)
}

/// Index of the `}` closing a segment whose code starts at `start`.
fn segment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' => {
                let len = scan_string(&bytes[i + 1..]).ok()?;
                i += len;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split a literal body into text and code parts.
///
/// `offset` is the absolute position of `body` in the source. Invalid
/// escapes are reported and kept verbatim.
pub(crate) fn split_template(body: &str, offset: u32) -> (Vec<TemplatePart>, Vec<LexError>) {
    let mut parts = Vec::new();
    let mut errors = Vec::new();
    let mut text = String::new();
    let bytes = body.as_bytes();
    let at = |i: usize| offset.saturating_add(u32::try_from(i).unwrap_or(u32::MAX));

    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, esc)) => match unescape(esc) {
                    Some(ch) => text.push(ch),
                    None => {
                        errors.push(LexError::new(
                            LexErrorKind::InvalidEscape(esc),
                            Span::new(at(i), at(i + 1 + esc.len_utf8())),
                        ));
                        text.push('\\');
                        text.push(esc);
                    }
                },
                None => text.push('\\'),
            },
            '$' if chars.peek().map(|&(_, next)| next) == Some('{') => {
                let code_start = i + 2;
                let Some(end) = segment_end(bytes, code_start) else {
                    errors.push(LexError::new(
                        LexErrorKind::UnterminatedInterpolation,
                        Span::new(at(i), at(body.len())),
                    ));
                    break;
                };
                if !text.is_empty() {
                    parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                }
                parts.push(TemplatePart::Code {
                    source: body[code_start..end].to_owned(),
                    offset: at(code_start),
                });
                while chars.peek().is_some_and(|&(j, _)| j <= end) {
                    chars.next();
                }
            }
            _ => text.push(c),
        }
    }
    if !text.is_empty() {
        parts.push(TemplatePart::Text(text));
    }
    (parts, errors)
}

fn unescape(esc: char) -> Option<char> {
    Some(match esc {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        '\\' => '\\',
        '"' => '"',
        '$' => '$',
        _ => return None,
    })
}

/// Inverse of the escape processing, used by the formatter.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scan_skips_quotes_inside_segments() {
        let src = br#"a ${f("}")} b" tail"#;
        assert_eq!(scan_string(src), Ok(14));
    }

    #[test]
    fn scan_reports_unterminated() {
        assert_eq!(scan_string(b"abc"), Err(LexErrorKind::UnterminatedString));
        assert_eq!(
            scan_string(b"a ${b"),
            Err(LexErrorKind::UnterminatedInterpolation)
        );
        assert_eq!(scan_string(b"trailing \\"), Err(LexErrorKind::UnterminatedString));
    }

    #[test]
    fn split_text_and_code() {
        let (parts, errors) = split_template("x = ${x + 1}!", 10);
        assert!(errors.is_empty());
        assert_eq!(
            parts,
            vec![
                TemplatePart::Text("x = ".into()),
                TemplatePart::Code {
                    source: "x + 1".into(),
                    offset: 16
                },
                TemplatePart::Text("!".into()),
            ]
        );
    }

    #[test]
    fn escapes_are_processed() {
        let (parts, errors) = split_template(r#"tab\there \"q\" \${no}"#, 0);
        assert!(errors.is_empty());
        assert_eq!(
            parts,
            vec![TemplatePart::Text("tab\there \"q\" ${no}".into())]
        );
    }

    #[test]
    fn invalid_escape_is_reported_and_kept() {
        let (parts, errors) = split_template(r"a\qb", 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidEscape('q'));
        assert_eq!(errors[0].span, Span::new(1, 3));
        assert_eq!(parts, vec![TemplatePart::Text(r"a\qb".into())]);
    }

    #[test]
    fn escape_text_inverts_split() {
        let original = "line\n\"quoted\" $5 \\";
        let escaped = escape_text(original);
        let (parts, _) = split_template(&escaped, 0);
        assert_eq!(parts, vec![TemplatePart::Text(original.into())]);
    }
}
