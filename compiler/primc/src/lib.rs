//! Prim compiler driver.
//!
//! Ties the pipeline together: lex → parse → {analyze ‖ interpret}. The
//! `prim` binary dispatches to these entry points and the integration tests
//! drive them directly.

mod dump;
mod pipeline;

pub use dump::dump_program;
pub use pipeline::{check_source, parse_source, run_source};
