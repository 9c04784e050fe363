//! Analyzer tests, driven through the lexer and parser.

use pretty_assertions::assert_eq;
use prim_ir::{ExprKind, StringInterner};
use prim_parse::ParseOutput;

use crate::{analyze, Analysis, AnalyzeError};

fn parsed(source: &str, interner: &StringInterner) -> ParseOutput {
    let tokens =
        prim_lexer::lex(source, interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    prim_parse::parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

fn analyze_source(source: &str, interner: &StringInterner) -> Result<Analysis, AnalyzeError> {
    let out = parsed(source, interner);
    analyze(&out.program, &out.ast, interner)
}

fn assert_analyzes(source: &str) -> Analysis {
    let interner = StringInterner::new();
    analyze_source(source, &interner).unwrap_or_else(|e| panic!("analysis failed: {e}"))
}

const MAIN_STUB: &str = "func main(): Integer { return 0; }";

#[test]
fn int_literal_at_i32_max_is_accepted() {
    assert_analyzes("func main(): Integer { return 2147483647; }");
}

#[test]
fn int_literal_beyond_i32_is_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { return 9223372036854775807; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::LiteralRange { .. })));
}

#[test]
fn field_access_resolves_to_integer_binding() {
    let interner = StringInterner::new();
    let source = "var num = 1;\nfunc main(): Integer { print(num); return 0; }";
    let out = parsed(source, &interner);
    let analysis = analyze(&out.program, &out.ast, &interner)
        .unwrap_or_else(|e| panic!("analysis failed: {e}"));

    // Find the access node for `num` inside main's call.
    let mut found = false;
    for idx in 0..out.ast.expr_count() {
        let id = prim_ir::ExprId::new(u32::try_from(idx).unwrap_or(u32::MAX));
        if let ExprKind::Access {
            receiver: None,
            name,
        } = out.ast.expr(id).kind
        {
            if name == interner.intern("num") {
                let binding = analysis
                    .access_binding(id)
                    .unwrap_or_else(|| panic!("access not annotated"));
                assert_eq!(binding.ty, analysis.types.integer);
                assert!(!binding.constant);
                assert_eq!(analysis.expr_type(id), Some(analysis.types.integer));
                found = true;
            }
        }
    }
    assert!(found, "no access to `num` in the tree");
}

#[test]
fn missing_main_is_fatal() {
    let interner = StringInterner::new();
    let err = analyze_source("func helper(): Integer { return 1; }", &interner);
    assert_eq!(err, Err(AnalyzeError::MainMissing));
}

#[test]
fn main_with_wrong_signature_is_missing() {
    let interner = StringInterner::new();
    // Wrong return type.
    assert_eq!(
        analyze_source("func main() { return; }", &interner),
        Err(AnalyzeError::MainMissing)
    );
    // Wrong arity.
    assert_eq!(
        analyze_source("func main(code: Integer): Integer { return code; }", &interner),
        Err(AnalyzeError::MainMissing)
    );
}

#[test]
fn duplicate_field_names_are_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source(&format!("var num = 1;\nvar num = 2;\n{MAIN_STUB}"), &interner);
    assert!(matches!(err, Err(AnalyzeError::Redefinition { .. })));
}

#[test]
fn local_may_shadow_field() {
    assert_analyzes("var num = 1;\nfunc main(): Integer { var num = \"text\"; return 0; }");
}

#[test]
fn duplicate_local_in_same_scope_is_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { var x = 1; var x = 2; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::Redefinition { .. })));
}

#[test]
fn declaration_may_not_reference_itself() {
    let interner = StringInterner::new();
    let err = analyze_source("func main(): Integer { var x = x + 1; return 0; }", &interner);
    assert!(matches!(err, Err(AnalyzeError::UndefinedBinding { .. })));
}

#[test]
fn declaration_without_type_or_initializer_is_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source("var num;\nfunc main(): Integer { return 0; }", &interner);
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn initializer_must_match_declared_type() {
    let interner = StringInterner::new();
    let err = analyze_source(
        &format!("var num: Integer = \"text\";\n{MAIN_STUB}"),
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn assignment_to_constant_is_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "const limit = 10;\nfunc main(): Integer { limit = 11; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn assignment_target_must_be_an_access() {
    let interner = StringInterner::new();
    let err = analyze_source("func main(): Integer { 1 = 2; return 0; }", &interner);
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn if_condition_must_be_boolean() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { if (1) { return 1; } return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn if_then_branch_must_be_non_empty() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { if (true) { } return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn return_type_is_checked_against_signature() {
    let interner = StringInterner::new();
    let err = analyze_source("func main(): Integer { return \"nope\"; }", &interner);
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn bare_return_types_as_nil() {
    // Nil return against a Nil-returning method is fine.
    assert_analyzes(&format!("func log() {{ return; }}\n{MAIN_STUB}"));
}

#[test]
fn logical_operators_require_booleans() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { var b = 1 && true; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn comparison_requires_same_comparable_type() {
    let interner = StringInterner::new();
    // Mixed Integer/Text comparison.
    let err = analyze_source(
        "func main(): Integer { var b = 1 < \"two\"; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
    // Booleans are not comparable.
    let err = analyze_source(
        "func main(): Integer { var b = true < false; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
    // Same-type comparison is fine.
    assert_analyzes("func main(): Integer { var b = 'a' < 'b'; return 0; }");
}

#[test]
fn mixed_numeric_arithmetic_is_rejected() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { var n = 1 + 2.5; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn text_concatenation_accepts_either_side() {
    assert_analyzes("func main(): Integer { var t = \"n = \" + 1; return 0; }");
    assert_analyzes("func main(): Integer { var t = 1 + \" items\"; return 0; }");
}

#[test]
fn power_takes_integer_exponent() {
    assert_analyzes("func main(): Integer { return 2 ^ 10; }");
    assert_analyzes("func main(): Integer { var d = 2.5 ^ 3; return 0; }");
    let interner = StringInterner::new();
    let err = analyze_source("func main(): Integer { return 2 ^ 0.5; }", &interner);
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn group_takes_inner_type() {
    let interner = StringInterner::new();
    let analysis = analyze_source(
        "func main(): Integer { return (1 + 2) * 3; }",
        &interner,
    )
    .unwrap_or_else(|e| panic!("analysis failed: {e}"));
    drop(analysis);
}

#[test]
fn call_resolves_by_name_and_arity() {
    assert_analyzes(
        "func add(a: Integer, b: Integer): Integer { return a + b; }\n\
         func add(a: Integer, b: Integer, c: Integer): Integer { return a + b + c; }\n\
         func main(): Integer { return add(1, add(2, 3, 4)); }",
    );
}

#[test]
fn call_with_unknown_arity_is_undefined() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func add(a: Integer, b: Integer): Integer { return a + b; }\n\
         func main(): Integer { return add(1); }",
        &interner,
    );
    assert_eq!(
        err,
        Err(AnalyzeError::UndefinedBinding {
            name: "add".to_string(),
            arity: Some(1),
        })
    );
}

#[test]
fn argument_types_are_checked_in_order() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func add(a: Integer, b: Integer): Integer { return a + b; }\n\
         func main(): Integer { return add(1, \"two\"); }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::TypeMismatch { .. })));
}

#[test]
fn forward_and_mutual_recursion_resolve() {
    assert_analyzes(
        "func main(): Integer { return even(10); }\n\
         func even(n: Integer): Integer { if (n == 0) { return 1; } return odd(n - 1); }\n\
         func odd(n: Integer): Integer { if (n == 0) { return 0; } return even(n - 1); }",
    );
}

#[test]
fn receiver_qualified_access_has_no_static_binding() {
    // Dotted access resolves only at runtime, against host-bound objects.
    let interner = StringInterner::new();
    let err = analyze_source(
        "var num = 1;\nfunc main(): Integer { return num.size; }",
        &interner,
    );
    assert_eq!(
        err,
        Err(AnalyzeError::UndefinedBinding {
            name: "size".to_string(),
            arity: None,
        })
    );
}

#[test]
fn receiver_qualified_call_has_no_static_binding() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "var num = 1;\nfunc main(): Integer { return num.size(); }",
        &interner,
    );
    assert_eq!(
        err,
        Err(AnalyzeError::UndefinedBinding {
            name: "size".to_string(),
            arity: Some(0),
        })
    );
}

#[test]
fn unknown_type_name_is_undefined() {
    let interner = StringInterner::new();
    let err = analyze_source(
        "func main(): Integer { var x: Widget = nil; return 0; }",
        &interner,
    );
    assert!(matches!(err, Err(AnalyzeError::UndefinedBinding { .. })));
}

#[test]
fn method_signatures_are_annotated() {
    let interner = StringInterner::new();
    let analysis = analyze_source(MAIN_STUB, &interner)
        .unwrap_or_else(|e| panic!("analysis failed: {e}"));
    let sig = analysis
        .method_sig(0)
        .unwrap_or_else(|| panic!("main signature missing"));
    assert_eq!(sig.arity(), 0);
    assert_eq!(sig.ret, analysis.types.integer);
    assert_ne!(sig.emit_name, "main");
}
