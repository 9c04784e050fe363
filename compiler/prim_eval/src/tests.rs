//! End-to-end interpreter tests, driven through the lexer and parser.
//!
//! None of these run the analyzer; the interpreter is an independent pass.

use pretty_assertions::assert_eq;
use prim_diagnostic::ErrorCode;
use prim_ir::StringInterner;

use crate::{
    BufferPrintHandler, EvalError, FunctionValue, Interpreter, Object, PrintHandler, Value,
};

/// Interpret `source` and return `main`'s result plus everything printed.
fn run_program(source: &str) -> (Result<Value, EvalError>, String) {
    let interner = StringInterner::new();
    let tokens =
        prim_lexer::lex(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    let out = prim_parse::parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let handler = BufferPrintHandler::new();
    let result = Interpreter::new(&out.program, &out.ast, &interner, &handler).run();
    (result, handler.output())
}

fn run_ok(source: &str) -> (Value, String) {
    let (result, output) = run_program(source);
    let value = result.unwrap_or_else(|e| panic!("evaluation failed: {e}"));
    (value, output)
}

fn run_err(source: &str) -> EvalError {
    let (result, _) = run_program(source);
    match result {
        Err(e) => e,
        Ok(v) => panic!("expected evaluation error, got {v:?}"),
    }
}

#[test]
fn main_result_is_the_program_result() {
    let (value, _) = run_ok("func main(): Integer { return 0; }");
    assert_eq!(value, Value::Int(0));
}

#[test]
fn while_loop_counts_to_ten() {
    let (value, _) = run_ok(
        "var num = 0;\n\
         func main(): Integer {\n\
             while (num < 10) { num = num + 1; }\n\
             return num;\n\
         }",
    );
    assert_eq!(value, Value::Int(10));
}

#[test]
fn logical_or_short_circuits_past_an_undefined_name() {
    // `missing` is never evaluated, so no undefined-binding error is raised.
    let (value, _) = run_ok(
        "func main(): Integer {\n\
             if (true || missing) { return 1; }\n\
             return 0;\n\
         }",
    );
    assert_eq!(value, Value::Int(1));
}

#[test]
fn logical_and_short_circuits_past_an_undefined_name() {
    let (value, _) = run_ok(
        "func main(): Integer {\n\
             if (false && missing) { return 1; }\n\
             return 0;\n\
         }",
    );
    assert_eq!(value, Value::Int(0));
}

#[test]
fn print_writes_the_textual_form() {
    let (value, output) = run_ok(
        "var num = 1;\n\
         func main(): Integer { print(num); return 0; }",
    );
    assert_eq!(value, Value::Int(0));
    assert_eq!(output, "1\n");
}

#[test]
fn integer_division() {
    let (value, _) = run_ok("func main(): Integer { return 10 / 2; }");
    assert_eq!(value, Value::Int(5));

    let err = run_err("func main(): Integer { return 1 / 0; }");
    assert_eq!(err.code, ErrorCode::E3001);
}

#[test]
fn for_step_runs_after_every_body_pass() {
    // Sums 0 + 1 + 2; a skipped step would loop forever on i == 0.
    let (value, _) = run_ok(
        "func main(): Integer {\n\
             var sum = 0;\n\
             for (var i = 0; i < 3; i = i + 1) { sum = sum + i; }\n\
             return sum;\n\
         }",
    );
    assert_eq!(value, Value::Int(3));
}

#[test]
fn return_unwinds_nested_blocks_to_the_call_boundary() {
    let (value, output) = run_ok(
        "func main(): Integer {\n\
             while (true) {\n\
                 if (true) { return 42; }\n\
                 print(\"unreachable\");\n\
             }\n\
             return 0;\n\
         }",
    );
    assert_eq!(value, Value::Int(42));
    assert_eq!(output, "");
}

#[test]
fn runs_without_prior_analysis() {
    // The analyzer would reject this literal (beyond 32 bits); the
    // interpreter is an independent pass and evaluates it anyway.
    let (value, _) = run_ok("func main(): Integer { return 3000000000; }");
    assert_eq!(value, Value::Int(3_000_000_000));
}

#[test]
fn condition_must_be_boolean_at_runtime() {
    let err = run_err("func main(): Integer { if (1) { return 1; } return 0; }");
    assert_eq!(err.code, ErrorCode::E3004);
}

#[test]
fn inner_scope_shadows_and_is_discarded() {
    let (_, output) = run_ok(
        "var num = 1;\n\
         func main(): Integer {\n\
             if (true) { var num = 5; print(num); }\n\
             print(num);\n\
             return 0;\n\
         }",
    );
    assert_eq!(output, "5\n1\n");
}

#[test]
fn while_body_scope_is_fresh_each_iteration() {
    // A stale per-loop scope would reject the second `var x` as a
    // redefinition.
    let (value, _) = run_ok(
        "func main(): Integer {\n\
             var i = 0;\n\
             while (i < 3) { var x = i; i = i + 1; }\n\
             return i;\n\
         }",
    );
    assert_eq!(value, Value::Int(3));
}

#[test]
fn parameters_bind_positionally() {
    let (value, _) = run_ok(
        "func sub(a: Integer, b: Integer): Integer { return a - b; }\n\
         func main(): Integer { return sub(10, 4); }",
    );
    assert_eq!(value, Value::Int(6));
}

#[test]
fn forward_and_mutual_recursion_resolve_at_runtime() {
    let (value, _) = run_ok(
        "func main(): Integer { return even(10); }\n\
         func even(n: Integer): Integer { if (n == 0) { return 1; } return odd(n - 1); }\n\
         func odd(n: Integer): Integer { if (n == 0) { return 0; } return even(n - 1); }",
    );
    assert_eq!(value, Value::Int(1));
}

#[test]
fn call_without_return_yields_nil() {
    let (value, output) = run_ok(
        "func log(msg: Text) { print(msg); }\n\
         func main(): Integer { log(\"hi\"); return 0; }",
    );
    assert_eq!(value, Value::Int(0));
    assert_eq!(output, "hi\n");
}

#[test]
fn functions_overload_by_argument_count() {
    let (value, _) = run_ok(
        "func add(a: Integer, b: Integer): Integer { return a + b; }\n\
         func add(a: Integer, b: Integer, c: Integer): Integer { return a + b + c; }\n\
         func main(): Integer { return add(1, add(2, 3, 4)); }",
    );
    assert_eq!(value, Value::Int(10));
}

#[test]
fn text_concatenation_in_print() {
    let (_, output) = run_ok(
        "func main(): Integer { print(\"n = \" + 1); return 0; }",
    );
    assert_eq!(output, "n = 1\n");
}

#[test]
fn assignment_to_constant_fails_at_runtime() {
    let err = run_err(
        "const limit = 1;\n\
         func main(): Integer { limit = 2; return 0; }",
    );
    assert_eq!(err.code, ErrorCode::E3004);
}

#[test]
fn undefined_name_is_a_runtime_error() {
    let err = run_err("func main(): Integer { return missing; }");
    assert_eq!(err.code, ErrorCode::E3003);
}

#[test]
fn missing_main_is_a_runtime_error() {
    let err = run_err("func helper(): Integer { return 1; }");
    assert_eq!(err.code, ErrorCode::E3003);
}

#[test]
fn field_initializers_run_in_declaration_order() {
    let (value, _) = run_ok(
        "var base = 2;\n\
         var doubled = base * 2;\n\
         func main(): Integer { return doubled; }",
    );
    assert_eq!(value, Value::Int(4));
}

#[test]
fn field_initializer_may_call_a_method() {
    let (value, _) = run_ok(
        "var answer = compute();\n\
         func compute(): Integer { return 6 * 7; }\n\
         func main(): Integer { return answer; }",
    );
    assert_eq!(value, Value::Int(42));
}

// Host-bound structured values

fn kind_method(_args: Vec<Value>, _print: &dyn PrintHandler) -> Result<Value, EvalError> {
    Ok(Value::text("point"))
}

/// Interpret `source` with a host-built `point` object (fields `x = 3`,
/// `y = 4`, method `kind/0`) bound in the root scope.
fn run_with_point(source: &str) -> (Result<Value, EvalError>, String) {
    let interner = StringInterner::new();
    let tokens =
        prim_lexer::lex(source, &interner).unwrap_or_else(|e| panic!("lex failed: {e}"));
    let out = prim_parse::parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let handler = BufferPrintHandler::new();
    let mut interpreter = Interpreter::new(&out.program, &out.ast, &interner, &handler);

    let point = Object::new(interner.intern("Point"));
    point.set_field(interner.intern("x"), Value::Int(3));
    point.set_field(interner.intern("y"), Value::Int(4));
    point.define_method(interner.intern("kind"), 0, FunctionValue::Builtin(kind_method));
    interpreter
        .define_global("point", Value::Object(point))
        .unwrap_or_else(|e| panic!("define_global failed: {e}"));

    let result = interpreter.run();
    (result, handler.output())
}

#[test]
fn host_object_fields_are_read_by_dotted_access() {
    let (result, _) = run_with_point("func main(): Integer { return point.x + point.y; }");
    assert_eq!(result, Ok(Value::Int(7)));
}

#[test]
fn host_object_fields_are_written_by_dotted_assignment() {
    let (result, _) = run_with_point(
        "func main(): Integer { point.x = point.x * 10; return point.x; }",
    );
    assert_eq!(result, Ok(Value::Int(30)));
}

#[test]
fn host_object_methods_dispatch_through_the_member_scope() {
    let (result, output) =
        run_with_point("func main(): Integer { print(point.kind()); return 0; }");
    assert_eq!(result, Ok(Value::Int(0)));
    assert_eq!(output, "point\n");
}

#[test]
fn missing_object_member_names_the_type() {
    let (result, _) = run_with_point("func main(): Integer { return point.z; }");
    let err = match result {
        Err(e) => e,
        Ok(v) => panic!("expected a member error, got {v:?}"),
    };
    assert_eq!(err.code, ErrorCode::E3004);
    assert_eq!(err.message, "`Point` has no member `z`");
}

#[test]
fn assignment_cannot_grow_an_object() {
    let (result, _) = run_with_point("func main(): Integer { point.z = 1; return 0; }");
    let err = match result {
        Err(e) => e,
        Ok(v) => panic!("expected a member error, got {v:?}"),
    };
    assert_eq!(err.message, "`Point` has no member `z`");
}

#[test]
fn member_access_on_a_scalar_fails() {
    let err = run_err(
        "var num = 1;\n\
         func main(): Integer { return num.size; }",
    );
    assert_eq!(err.code, ErrorCode::E3004);
}

#[test]
fn host_scalar_globals_are_plain_bindings() {
    let interner = StringInterner::new();
    let tokens = prim_lexer::lex("func main(): Integer { return limit * 2; }", &interner)
        .unwrap_or_else(|e| panic!("lex failed: {e}"));
    let out = prim_parse::parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let handler = BufferPrintHandler::new();
    let mut interpreter = Interpreter::new(&out.program, &out.ast, &interner, &handler);
    interpreter
        .define_global("limit", Value::Int(21))
        .unwrap_or_else(|e| panic!("define_global failed: {e}"));
    assert_eq!(interpreter.run(), Ok(Value::Int(42)));
}

#[test]
fn decimal_arithmetic_runs() {
    let (value, _) = run_ok(
        "func main(): Integer {\n\
             var d = 1.5 * 2.0;\n\
             if (d == 3.0) { return 1; }\n\
             return 0;\n\
         }",
    );
    assert_eq!(value, Value::Int(1));
}
