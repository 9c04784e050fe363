//! Evaluation errors and their constructors.
//!
//! One error struct with factory functions per failure mode, so call sites
//! stay short and messages live in one place. `return` is NOT an error —
//! it travels through [`crate::Flow`], never through this type.

use std::fmt;

use prim_diagnostic::{Diagnostic, ErrorCode};
use prim_ir::BinaryOp;

use crate::Value;

/// Runtime failure. Unwinds to the top-level caller; nothing absorbs it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        EvalError {
            code,
            message: message.into(),
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code, self.message)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult = Result<Value, EvalError>;

// Factories

pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::new(ErrorCode::E3003, format!("`{name}` is not defined"))
}

pub fn undefined_function(name: &str, arity: usize) -> EvalError {
    EvalError::new(
        ErrorCode::E3003,
        format!("no function `{name}` taking {arity} argument(s)"),
    )
}

pub fn redefined(name: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E2002,
        format!("`{name}` is already defined in this scope"),
    )
}

pub fn division_by_zero() -> EvalError {
    EvalError::new(ErrorCode::E3001, "division by zero")
}

pub fn invalid_operator(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::new(
        ErrorCode::E3002,
        format!(
            "operator `{op}` cannot combine {} and {}",
            left.kind_name(),
            right.kind_name()
        ),
    )
}

pub fn type_mismatch(expected: &str, actual: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E3004,
        format!("expected {expected}, found {actual}"),
    )
}

pub fn invalid_assignment_target() -> EvalError {
    EvalError::new(
        ErrorCode::E3004,
        "left side of assignment must be a variable or field",
    )
}

pub fn assign_to_constant(name: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E3004,
        format!("cannot assign to constant `{name}`"),
    )
}

pub fn cannot_access_member(value: &Value, name: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E3004,
        format!("{} value has no member `{name}`", value.kind_name()),
    )
}

pub fn no_such_member(type_name: &str, member: &str) -> EvalError {
    EvalError::new(
        ErrorCode::E3004,
        format!("`{type_name}` has no member `{member}`"),
    )
}
