//! Pipeline entry points.
//!
//! Each function covers one CLI command and returns the first error from
//! whichever pass was running, already converted to a [`Diagnostic`].

use prim_analyze::Analysis;
use prim_diagnostic::Diagnostic;
use prim_eval::{Interpreter, PrintHandler, Value};
use prim_ir::StringInterner;
use prim_parse::ParseOutput;
use tracing::debug;

/// Lex and parse `source`.
pub fn parse_source(source: &str, interner: &StringInterner) -> Result<ParseOutput, Diagnostic> {
    debug!(bytes = source.len(), "parsing");
    let tokens = prim_lexer::lex(source, interner).map_err(|e| e.into_diagnostic())?;
    prim_parse::parse(&tokens).map_err(|e| e.into_diagnostic())
}

/// Parse and statically check `source`.
pub fn check_source(source: &str, interner: &StringInterner) -> Result<Analysis, Diagnostic> {
    let out = parse_source(source, interner)?;
    prim_analyze::analyze(&out.program, &out.ast, interner).map_err(|e| e.into_diagnostic())
}

/// Parse and interpret `source`, writing `print` output through `handler`.
///
/// The analyzer is not involved: the interpreter re-resolves names and
/// re-checks types dynamically.
pub fn run_source(
    source: &str,
    interner: &StringInterner,
    handler: &dyn PrintHandler,
) -> Result<Value, Diagnostic> {
    let out = parse_source(source, interner)?;
    Interpreter::new(&out.program, &out.ast, interner, handler)
        .run()
        .map_err(|e| e.into_diagnostic())
}
