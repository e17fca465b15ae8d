//! Python-compatible operator semantics.
//!
//! Integers stay integers where Python keeps them (`+ - * % **` with a
//! non-negative exponent); `/` is always true division. Integer overflow
//! falls back to floats instead of wrapping.

use fleaux_core::RuntimeError;
use fleaux_parser::ast::{BinaryOp, UnaryOp};

use crate::value::Value;

/// Largest sequence, in elements or bytes, that repetition may build.
pub const MAX_REPEAT_LEN: usize = 1 << 28;

fn mismatch(context: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        context: context.to_string(),
        expected: left.type_name().to_string(),
        actual: right.type_name().to_string(),
    }
}

/// Integer view of a bool/int operand pair, if both are integral types.
fn int_pair(left: &Value, right: &Value) -> Option<(i64, i64)> {
    let as_int = |v: &Value| match v {
        Value::Int(i) => Some(*i),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    };
    Some((as_int(left)?, as_int(right)?))
}

fn float_pair(left: &Value, right: &Value) -> Option<(f64, f64)> {
    Some((left.as_float()?, right.as_float()?))
}

pub fn add(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let Some((a, b)) = int_pair(left, right) {
        return Ok(a.checked_add(b).map_or(Value::Float(a as f64 + b as f64), Value::Int));
    }
    if let Some((a, b)) = float_pair(left, right) {
        return Ok(Value::Float(a + b));
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::Tuple(a.iter().chain(b).cloned().collect()))
        }
        _ => Err(mismatch("+", left, right)),
    }
}

pub fn sub(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let Some((a, b)) = int_pair(left, right) {
        return Ok(a.checked_sub(b).map_or(Value::Float(a as f64 - b as f64), Value::Int));
    }
    float_pair(left, right)
        .map(|(a, b)| Value::Float(a - b))
        .ok_or_else(|| mismatch("-", left, right))
}

pub fn mul(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let Some((a, b)) = int_pair(left, right) {
        return Ok(a.checked_mul(b).map_or(Value::Float(a as f64 * b as f64), Value::Int));
    }
    if let Some((a, b)) = float_pair(left, right) {
        return Ok(Value::Float(a * b));
    }
    // sequence repetition, either operand order
    let (seq, n) = match (left, right) {
        (Value::Int(n), seq) | (seq, Value::Int(n)) => (seq, *n),
        _ => return Err(mismatch("*", left, right)),
    };
    let len = match seq {
        Value::String(s) => s.len(),
        Value::Tuple(items) => items.len(),
        _ => return Err(mismatch("*", left, right)),
    };
    let count = match usize::try_from(n.max(0)) {
        _ if len == 0 => 0,
        Ok(count) => count,
        Err(_) => usize::MAX,
    };
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => {}
        _ => return Err(RuntimeError::RepetitionTooLarge { len, count: n }),
    }
    match seq {
        Value::String(s) => Ok(Value::String(s.repeat(count))),
        Value::Tuple(items) => Ok(Value::Tuple(
            std::iter::repeat_n(items.iter().cloned(), count).flatten().collect(),
        )),
        _ => Err(mismatch("*", left, right)),
    }
}

pub fn div(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (a, b) = float_pair(left, right).ok_or_else(|| mismatch("/", left, right))?;
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

/// Python `%`: the result takes the sign of the divisor.
pub fn modulo(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let Some((a, b)) = int_pair(left, right) {
        if b == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let r = a.wrapping_rem(b);
        return Ok(Value::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }));
    }
    let (a, b) = float_pair(left, right).ok_or_else(|| mismatch("%", left, right))?;
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(a - b * (a / b).floor()))
}

/// Python `**`.
pub fn pow(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let Some((a, b)) = int_pair(left, right) {
        if let Ok(exp) = u32::try_from(b) {
            return Ok(a
                .checked_pow(exp)
                .map_or(Value::Float((a as f64).powf(b as f64)), Value::Int));
        }
    }
    let (a, b) = float_pair(left, right).ok_or_else(|| mismatch("**", left, right))?;
    if a == 0.0 && b < 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(a.powf(b)))
}

/// Evaluate a non-short-circuit binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    use std::cmp::Ordering::*;
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => sub(left, right),
        BinaryOp::Mul => mul(left, right),
        BinaryOp::Div => div(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Pow => pow(left, right),
        BinaryOp::Equal => Ok(Value::Bool(left.py_eq(right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!left.py_eq(right))),
        BinaryOp::Less => Ok(Value::Bool(left.py_cmp(right)? == Less)),
        BinaryOp::LessEqual => Ok(Value::Bool(left.py_cmp(right)? != Greater)),
        BinaryOp::Greater => Ok(Value::Bool(left.py_cmp(right)? == Greater)),
        BinaryOp::GreaterEqual => Ok(Value::Bool(left.py_cmp(right)? != Less)),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Comma | BinaryOp::Pipeline => {
            Err(RuntimeError::TypeMismatch {
                context: format!("operator '{op}'"),
                expected: "an eager binary operator".into(),
                actual: op.to_string(),
            })
        }
    }
}

pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
        (UnaryOp::Neg, Value::Int(v)) => {
            Ok(v.checked_neg().map_or(Value::Float(-(*v as f64)), Value::Int))
        }
        (UnaryOp::Neg, Value::Bool(v)) => Ok(Value::Int(-(*v as i64))),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Plus, Value::Bool(v)) => Ok(Value::Int(*v as i64)),
        (UnaryOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => Ok(v.clone()),
        (op, v) => Err(RuntimeError::TypeMismatch {
            context: format!("unary '{op}'"),
            expected: "number".into(),
            actual: v.type_name().into(),
        }),
    }
}
