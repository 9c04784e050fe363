//! Diagnostic reporting for the Prim front end.
//!
//! Every error a pass raises carries a human-readable message; parse-time
//! errors additionally carry the source offset of the offending token.
//! Each pass aborts on its first error, so a diagnostic is always the
//! complete report for its pass.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
