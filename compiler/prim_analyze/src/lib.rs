//! Static analysis for Prim.
//!
//! A single depth-first pass over the parsed tree that resolves identifiers
//! against a static scope chain, checks the typing rules, and records what
//! it resolved in side-tables keyed by node id (the [`Analysis`] output a
//! source emitter consumes). The tree itself is never mutated.
//!
//! The pass carries its context — the current scope handle and the
//! enclosing method's declared return type — as an explicit [`check::Ctx`]
//! argument through every visit, and aborts on the first error.
//!
//! The interpreter in `prim_eval` does not depend on this pass; it
//! re-resolves names and re-checks types dynamically over the same tree.

mod analysis;
pub mod check;
mod error;
mod types;

pub use analysis::{Analysis, FnId, FnInfo, VarId, VarInfo};
pub use check::analyze;
pub use error::AnalyzeError;
pub use types::{require_assignable, TypeId, TypePool};
