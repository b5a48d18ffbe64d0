use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2003.as_str(), "E2003");
}

#[test]
fn test_all_variants_classified_once() {
    for code in ErrorCode::ALL {
        let classes = [
            code.is_lexer_error(),
            code.is_parser_error(),
            code.is_semantic_error(),
            code.is_eval_error(),
            code.is_internal_error(),
        ];
        assert_eq!(
            classes.iter().filter(|c| **c).count(),
            1,
            "{code} must belong to exactly one phase"
        );
    }
}

#[test]
fn test_from_str_round_trips() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e6001".parse::<ErrorCode>(), Ok(ErrorCode::E6001));
    assert_eq!("E7777".parse::<ErrorCode>(), Err(()));
}

#[test]
fn test_every_code_has_a_description() {
    for code in ErrorCode::ALL {
        assert!(!code.description().is_empty(), "{code} has no description");
    }
    assert_eq!(ErrorCode::E6001.description(), "Division by zero");
}
