//! Error codes for all Sepia diagnostics.
//!
//! The first digit names the phase that produced the diagnostic.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Resolution and type errors
/// - E6xxx: Runtime errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Unterminated interpolation segment
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,
    /// Invalid assignment target
    E1006,

    // Resolution Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Unknown type
    E2002,
    /// Undeclared identifier
    E2003,
    /// Argument count mismatch
    E2004,
    /// Ambiguous declared type
    E2005,
    /// Call of a non-callable value
    E2006,
    /// Return type mismatch
    E2007,
    /// Not all paths return a value
    E2008,
    /// `return` outside a function
    E2009,
    /// `break`/`continue` outside a loop
    E2010,
    /// Operator applied to unsupported operand types
    E2011,
    /// Unsupported construct
    E2012,

    // Runtime Errors (E6xxx)
    /// Division by zero
    E6001,
    /// Modulo by zero
    E6002,
    /// Integer overflow
    E6003,
    /// Shift operand outside the 32-bit range
    E6004,
    /// Runtime type mismatch
    E6005,
    /// Invalid binary operation
    E6006,
    /// Invalid unary operation
    E6007,
    /// Argument type mismatch
    E6008,
    /// Argument count mismatch
    E6009,
    /// Return value of the wrong type
    E6010,
    /// Call of a non-callable value
    E6011,
    /// Maximum recursion depth exceeded
    E6012,
    /// Native function failure
    E6020,
    /// Uncategorised runtime error
    E6099,

    // Internal Errors (E9xxx)
    /// Resolver and evaluator disagree about a slot
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E6001,
        ErrorCode::E6002,
        ErrorCode::E6003,
        ErrorCode::E6004,
        ErrorCode::E6005,
        ErrorCode::E6006,
        ErrorCode::E6007,
        ErrorCode::E6008,
        ErrorCode::E6009,
        ErrorCode::E6010,
        ErrorCode::E6011,
        ErrorCode::E6012,
        ErrorCode::E6020,
        ErrorCode::E6099,
        ErrorCode::E9001,
    ];

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6020 => "E6020",
            ErrorCode::E6099 => "E6099",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary of what the code means, for `sepia explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "Unterminated string literal",
            ErrorCode::E0002 => "Invalid character in source",
            ErrorCode::E0003 => "Invalid number literal",
            ErrorCode::E0004 => "Invalid escape sequence",
            ErrorCode::E0005 => "Unterminated interpolation segment",
            ErrorCode::E0006 => "Unterminated block comment",
            ErrorCode::E1001 => "Unexpected token",
            ErrorCode::E1002 => "Expected expression",
            ErrorCode::E1003 => "Unclosed delimiter",
            ErrorCode::E1004 => "Expected identifier",
            ErrorCode::E1005 => "Expected type",
            ErrorCode::E1006 => "Invalid assignment target",
            ErrorCode::E2001 => "Type mismatch",
            ErrorCode::E2002 => "Unknown type",
            ErrorCode::E2003 => "Undeclared identifier",
            ErrorCode::E2004 => "Argument count mismatch",
            ErrorCode::E2005 => "Ambiguous declared type",
            ErrorCode::E2006 => "Call of a non-callable value",
            ErrorCode::E2007 => "Return type mismatch",
            ErrorCode::E2008 => "Not all paths return a value",
            ErrorCode::E2009 => "`return` outside a function",
            ErrorCode::E2010 => "`break`/`continue` outside a loop",
            ErrorCode::E2011 => "Operator applied to unsupported operand types",
            ErrorCode::E2012 => "Unsupported construct",
            ErrorCode::E6001 => "Division by zero",
            ErrorCode::E6002 => "Modulo by zero",
            ErrorCode::E6003 => "Integer overflow",
            ErrorCode::E6004 => "Shift operand outside the 32-bit range",
            ErrorCode::E6005 => "Runtime type mismatch",
            ErrorCode::E6006 => "Invalid binary operation",
            ErrorCode::E6007 => "Invalid unary operation",
            ErrorCode::E6008 => "Argument type mismatch",
            ErrorCode::E6009 => "Argument count mismatch",
            ErrorCode::E6010 => "Return value of the wrong type",
            ErrorCode::E6011 => "Call of a non-callable value",
            ErrorCode::E6012 => "Maximum recursion depth exceeded",
            ErrorCode::E6020 => "Native function failure",
            ErrorCode::E6099 => "Uncategorised runtime error",
            ErrorCode::E9001 => "Resolver and evaluator disagree about a slot",
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Resolution and type errors (E2xxx range).
    pub fn is_semantic_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_eval_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2001"`, case-insensitively.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
