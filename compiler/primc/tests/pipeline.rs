//! End-to-end pipeline tests through the driver entry points.

use pretty_assertions::assert_eq;
use prim_diagnostic::ErrorCode;
use prim_eval::{BufferPrintHandler, Value};
use prim_ir::StringInterner;
use primc::{check_source, run_source};

const HELLO: &str = "\
var num = 1;

func main(): Integer {
    print(num);
    return 0;
}
";

#[test]
fn check_then_run_the_same_source() {
    let interner = StringInterner::new();
    let analysis =
        check_source(HELLO, &interner).unwrap_or_else(|d| panic!("check failed: {d}"));
    let sig = analysis
        .method_sig(0)
        .unwrap_or_else(|| panic!("main signature missing"));
    assert_eq!(sig.ret, analysis.types.integer);

    let handler = BufferPrintHandler::new();
    let result = run_source(HELLO, &interner, &handler)
        .unwrap_or_else(|d| panic!("run failed: {d}"));
    assert_eq!(result, Value::Int(0));
    assert_eq!(handler.output(), "1\n");
}

#[test]
fn parse_errors_carry_the_offending_offset() {
    let interner = StringInterner::new();
    let diagnostic = match check_source("func main(): Integer { return 0 }", &interner) {
        Err(d) => d,
        Ok(_) => panic!("expected a parse error"),
    };
    assert_eq!(diagnostic.code, ErrorCode::E1001);
    let span = diagnostic
        .span
        .unwrap_or_else(|| panic!("parse diagnostic has no span"));
    assert_eq!(span.start, 32);
    // Rendering maps the offset onto the source text.
    assert!(diagnostic.render(Some("func main(): Integer { return 0 }")).contains("(1:33)"));
}

#[test]
fn check_rejects_a_missing_main() {
    let interner = StringInterner::new();
    let diagnostic = match check_source("func helper(): Integer { return 1; }", &interner) {
        Err(d) => d,
        Ok(_) => panic!("expected analysis to fail"),
    };
    assert_eq!(diagnostic.code, ErrorCode::E2005);
}

#[test]
fn run_does_not_require_analysis_to_pass() {
    // The analyzer rejects this program (literal beyond 32 bits) but the
    // interpreter is an independent pass and runs it.
    let source = "func main(): Integer { return 3000000000; }";
    let interner = StringInterner::new();
    assert!(check_source(source, &interner).is_err());

    let handler = BufferPrintHandler::new();
    let result = run_source(source, &interner, &handler)
        .unwrap_or_else(|d| panic!("run failed: {d}"));
    assert_eq!(result, Value::Int(3_000_000_000));
}

#[test]
fn runtime_errors_become_diagnostics() {
    let interner = StringInterner::new();
    let handler = BufferPrintHandler::new();
    let diagnostic = match run_source(
        "func main(): Integer { return 1 / 0; }",
        &interner,
        &handler,
    ) {
        Err(d) => d,
        Ok(v) => panic!("expected a runtime error, got {v:?}"),
    };
    assert_eq!(diagnostic.code, ErrorCode::E3001);
}

#[test]
fn countdown_program_end_to_end() {
    let source = "\
const start: Integer = 3;

func countdown(from: Integer) {
    var i = from;
    while (i > 0) {
        print(i);
        i = i - 1;
    }
    print(\"done\");
}

func main(): Integer {
    countdown(start);
    return 0;
}
";
    let interner = StringInterner::new();
    check_source(source, &interner).unwrap_or_else(|d| panic!("check failed: {d}"));

    let handler = BufferPrintHandler::new();
    let result = run_source(source, &interner, &handler)
        .unwrap_or_else(|d| panic!("run failed: {d}"));
    assert_eq!(result, Value::Int(0));
    assert_eq!(handler.output(), "3\n2\n1\ndone\n");
}
