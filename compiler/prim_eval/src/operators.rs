//! Binary operator implementations.
//!
//! Direct enum-based dispatch on `(Value, Value, BinaryOp)`. The value set
//! is fixed, so pattern matching gives exhaustiveness checking that trait
//! objects would not.
//!
//! `&&` and `||` are NOT handled here — they short-circuit, so the caller
//! must decide whether the right operand is evaluated at all.

use prim_ir::BinaryOp;

use crate::{division_by_zero, invalid_operator, EvalResult, Value};

/// Evaluate a binary operation on two already-evaluated operands.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    // Equality is value equality across every kind.
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => return Ok(Value::Bool(left != right)),
        // Text concatenation wins whenever either operand is Text.
        BinaryOp::Add if left.is_text() || right.is_text() => {
            return Ok(Value::text(&format!("{left}{right}")));
        }
        _ => {}
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Decimal(a), Value::Decimal(b)) => eval_decimal_binary(*a, *b, op),
        // Exponentiation takes an Integer exponent for either base kind.
        (Value::Decimal(a), Value::Int(b)) if op == BinaryOp::Pow => {
            eval_decimal_pow(*a, *b).ok_or_else(|| invalid_operator(op, &left, &right))
        }
        (Value::Char(a), Value::Char(b)) => eval_ordered(*a, *b, op)
            .ok_or_else(|| invalid_operator(op, &left, &right)),
        (Value::Text(a), Value::Text(b)) => eval_ordered(a.as_ref(), b.as_ref(), op)
            .ok_or_else(|| invalid_operator(op, &left, &right)),
        _ => Err(invalid_operator(op, &left, &right)),
    }
}

/// Integer arithmetic and ordering. Arithmetic wraps; division checks for
/// a zero divisor first.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
        BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        BinaryOp::Div => {
            if b == 0 {
                Err(division_by_zero())
            } else {
                Ok(Value::Int(a.wrapping_div(b)))
            }
        }
        BinaryOp::Pow => match u32::try_from(b) {
            Ok(exp) => Ok(Value::Int(a.wrapping_pow(exp))),
            Err(_) => Err(invalid_operator(op, &Value::Int(a), &Value::Int(b))),
        },
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_operator(op, &Value::Int(a), &Value::Int(b))),
    }
}

/// Decimal arithmetic and ordering, IEEE 754 semantics throughout.
fn eval_decimal_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    use std::cmp::Ordering;
    let ordering = |wanted: &[Ordering]| {
        Value::Bool(a.partial_cmp(&b).is_some_and(|o| wanted.contains(&o)))
    };
    match op {
        BinaryOp::Add => Ok(Value::Decimal(a + b)),
        BinaryOp::Sub => Ok(Value::Decimal(a - b)),
        BinaryOp::Mul => Ok(Value::Decimal(a * b)),
        BinaryOp::Div => Ok(Value::Decimal(a / b)),
        BinaryOp::Lt => Ok(ordering(&[Ordering::Less])),
        BinaryOp::LtEq => Ok(ordering(&[Ordering::Less, Ordering::Equal])),
        BinaryOp::Gt => Ok(ordering(&[Ordering::Greater])),
        BinaryOp::GtEq => Ok(ordering(&[Ordering::Greater, Ordering::Equal])),
        _ => Err(invalid_operator(op, &Value::Decimal(a), &Value::Decimal(b))),
    }
}

fn eval_decimal_pow(base: f64, exp: i64) -> Option<Value> {
    let exp = i32::try_from(exp).ok()?;
    Some(Value::Decimal(base.powi(exp)))
}

/// Natural ordering for kinds that only support comparison.
fn eval_ordered<T: Ord>(a: T, b: T, op: BinaryOp) -> Option<Value> {
    let result = match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::GtEq => a >= b,
        _ => return None,
    };
    Some(Value::Bool(result))
}
