//! Static analysis errors.

use std::fmt;

use prim_diagnostic::{Diagnostic, ErrorCode};

/// Error raised by the analyzer; the first one aborts the pass.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AnalyzeError {
    /// Identifier or function not found in any enclosing scope.
    UndefinedBinding {
        name: String,
        /// Present when the lookup was for a function.
        arity: Option<usize>,
    },
    /// Duplicate binding in the same scope.
    Redefinition { name: String },
    /// Assignability or operator-typing violation.
    TypeMismatch { message: String },
    /// Literal value outside the representable range.
    LiteralRange { message: String },
    /// No zero-parameter `main` method with declared return type Integer.
    MainMissing,
}

impl AnalyzeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalyzeError::UndefinedBinding { .. } => ErrorCode::E2001,
            AnalyzeError::Redefinition { .. } => ErrorCode::E2002,
            AnalyzeError::TypeMismatch { .. } => ErrorCode::E2003,
            AnalyzeError::LiteralRange { .. } => ErrorCode::E2004,
            AnalyzeError::MainMissing => ErrorCode::E2005,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzeError::UndefinedBinding { name, arity: None } => {
                write!(f, "`{name}` is not defined")
            }
            AnalyzeError::UndefinedBinding {
                name,
                arity: Some(arity),
            } => {
                write!(f, "no function `{name}` taking {arity} argument(s)")
            }
            AnalyzeError::Redefinition { name } => {
                write!(f, "`{name}` is already defined in this scope")
            }
            AnalyzeError::TypeMismatch { message } | AnalyzeError::LiteralRange { message } => {
                f.write_str(message)
            }
            AnalyzeError::MainMissing => {
                f.write_str("no `main` method with zero parameters returning Integer")
            }
        }
    }
}

impl std::error::Error for AnalyzeError {}
