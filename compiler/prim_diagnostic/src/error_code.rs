//! Stable error codes.
//!
//! Numbering: `E1xxx` parse, `E2xxx` static analysis, `E3xxx` runtime.

use std::fmt;

/// Error codes for every diagnostic the front end can raise.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Unexpected token while parsing.
    E1001,
    /// Malformed or unterminated literal.
    E1002,
    /// Unexpected character in the source text.
    E1003,

    /// Identifier or function not found in any enclosing scope.
    E2001,
    /// Duplicate binding in the same scope.
    E2002,
    /// Assignability or operator-typing violation.
    E2003,
    /// Literal value outside the representable range.
    E2004,
    /// No zero-parameter `main` method returning Integer.
    E2005,

    /// Integer division by zero.
    E3001,
    /// Operand combination not supported by an operator.
    E3002,
    /// Identifier or function not found at evaluation time.
    E3003,
    /// Runtime value of the wrong kind.
    E3004,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
