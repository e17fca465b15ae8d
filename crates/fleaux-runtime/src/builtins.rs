//! The builtin capability set.
//!
//! Every builtin takes one bundle and returns a value (a tuple when it yields
//! several results). Each operation unpacks the bundle positionally the way
//! the Python builtin module does.

use std::fmt;

use fleaux_core::RuntimeError;

use crate::console::Console;
use crate::ops;
use crate::value::{Bundle, Value};

/// A builtin operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Add,
    Subtract,
    Multiply,
    Divide,
    Pow,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Println,
    Printf,
    In,
    Extract,
    ElementAt,
    Slice,
    Take,
    Drop,
    Length,
    ToNum,
    Wrap,
    Unwrap,
    GetArgs,
}

impl Builtin {
    /// Look a builtin up by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        use Builtin::*;
        Some(match name {
            "Add" => Add,
            "Subtract" => Subtract,
            "Multiply" => Multiply,
            "Divide" => Divide,
            "Pow" => Pow,
            "Sqrt" => Sqrt,
            "Sin" => Sin,
            "Cos" => Cos,
            "Tan" => Tan,
            "Println" => Println,
            "Printf" => Printf,
            "In" => In,
            "Extract" => Extract,
            "ElementAt" => ElementAt,
            "Slice" => Slice,
            "Take" => Take,
            "Drop" => Drop,
            "Length" => Length,
            "ToNum" => ToNum,
            "Wrap" => Wrap,
            "Unwrap" => Unwrap,
            "GetArgs" => GetArgs,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        use Builtin::*;
        match self {
            Add => "Add",
            Subtract => "Subtract",
            Multiply => "Multiply",
            Divide => "Divide",
            Pow => "Pow",
            Sqrt => "Sqrt",
            Sin => "Sin",
            Cos => "Cos",
            Tan => "Tan",
            Println => "Println",
            Printf => "Printf",
            In => "In",
            Extract => "Extract",
            ElementAt => "ElementAt",
            Slice => "Slice",
            Take => "Take",
            Drop => "Drop",
            Length => "Length",
            ToNum => "ToNum",
            Wrap => "Wrap",
            Unwrap => "Unwrap",
            GetArgs => "GetArgs",
        }
    }

    /// Run the builtin on `bundle`.
    pub fn call(self, bundle: Bundle, console: &mut Console) -> Result<Value, RuntimeError> {
        use Builtin::*;
        match self {
            Add => {
                // the builtin module adds right-hand first: (a, b) -> Add is b + a
                let [lhs, rhs] = self.unpack(bundle)?;
                ops::add(&rhs, &lhs)
            }
            Subtract => self.binary(bundle, ops::sub),
            Multiply => self.binary(bundle, ops::mul),
            Divide => self.binary(bundle, ops::div),
            Pow => {
                let [base, exp] = self.unpack(bundle)?;
                let (b, e) = (self.number(&base)?, self.number(&exp)?);
                if b == 0.0 && e < 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Value::Float(b.powf(e)))
            }
            Sqrt => {
                let [x] = self.unpack(bundle)?;
                let x = self.number(&x)?;
                if x < 0.0 {
                    return Err(self.type_error("non-negative number", "negative number"));
                }
                Ok(Value::Float(x.sqrt()))
            }
            Sin => self.float_fn(bundle, f64::sin),
            Cos => self.float_fn(bundle, f64::cos),
            Tan => self.float_fn(bundle, f64::tan),

            Println => {
                let line = bundle
                    .items()
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                console.write_line(&line)?;
                Ok(bundle.into_value())
            }
            Printf => {
                let mut items = bundle.into_items();
                if items.is_empty() {
                    return Err(self.arity("at least 1", 0));
                }
                let format = match items.remove(0) {
                    Value::String(format) => format,
                    other => return Err(self.type_error("str", other.type_name())),
                };
                let args = Value::Tuple(items);
                console.write_line(&format_positional(&format, &args))?;
                Ok(Value::Tuple(vec![Value::String(format), args]))
            }
            In => {
                let [count] = self.unpack(bundle)?;
                let count = self.integer(&count)?;
                if count <= 0 {
                    return Err(RuntimeError::InvalidInputCount { count });
                }
                let lines = (0..count)
                    .map(|_| console.read_line().map(Value::String))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Tuple(lines))
            }

            Extract | ElementAt => {
                let [seq, index] = self.unpack(bundle)?;
                let index = self.integer(&index)?;
                let items = self.sequence(seq)?;
                let len = items.len();
                normalize_index(index, len)
                    .map(|i| items.element(i))
                    .ok_or(RuntimeError::IndexOutOfRange { index, len })
            }
            Slice => {
                let mut items = bundle.into_items().into_iter();
                let seq = items.next();
                let bounds = items
                    .map(|b| match b {
                        Value::Null => Ok(None),
                        b => self.integer(&b).map(Some),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let seq = match (seq, bounds.len()) {
                    (Some(seq), 1..=3) => seq,
                    (seq, n) => return Err(self.arity("2 to 4", n + usize::from(seq.is_some()))),
                };
                let (start, stop, step) = match bounds.as_slice() {
                    [stop] => (None, *stop, None),
                    [start, stop] => (*start, *stop, None),
                    [start, stop, step] => (*start, *stop, *step),
                    _ => (None, None, None),
                };
                self.sequence(seq)?.slice(start, stop, step)
            }
            Take => {
                let [seq, stop] = self.unpack(bundle)?;
                let stop = self.integer(&stop)?;
                self.sequence(seq)?.slice(None, Some(stop), None)
            }
            Drop => {
                let [seq, start] = self.unpack(bundle)?;
                let start = self.integer(&start)?;
                self.sequence(seq)?.slice(Some(start), None, None)
            }
            Length => Ok(Value::Int(bundle.len() as i64)),
            ToNum => {
                let [text] = self.unpack(bundle)?;
                let number = match &text {
                    Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                        RuntimeError::InvalidNumber { text: s.clone() }
                    })?,
                    other => self.number(other)?,
                };
                Ok(collapse_integral(number))
            }

            Wrap => Ok(Value::Tuple(vec![bundle.into_value()])),
            Unwrap => {
                let [value] = self.unpack(bundle)?;
                Ok(value)
            }
            GetArgs => Ok(Value::Tuple(
                console.args().iter().map(|a| Value::String(a.clone())).collect(),
            )),
        }
    }

    // ==========================================================================
    // Argument helpers
    // ==========================================================================

    fn unpack<const N: usize>(&self, bundle: Bundle) -> Result<[Value; N], RuntimeError> {
        let got = bundle.len();
        <[Value; N]>::try_from(bundle.into_items()).map_err(|_| self.arity(&N.to_string(), got))
    }

    fn binary(
        &self,
        bundle: Bundle,
        op: fn(&Value, &Value) -> Result<Value, RuntimeError>,
    ) -> Result<Value, RuntimeError> {
        let [lhs, rhs] = self.unpack(bundle)?;
        op(&lhs, &rhs)
    }

    fn float_fn(&self, bundle: Bundle, f: fn(f64) -> f64) -> Result<Value, RuntimeError> {
        let [x] = self.unpack(bundle)?;
        Ok(Value::Float(f(self.number(&x)?)))
    }

    fn number(&self, value: &Value) -> Result<f64, RuntimeError> {
        value
            .as_float()
            .ok_or_else(|| self.type_error("number", value.type_name()))
    }

    fn integer(&self, value: &Value) -> Result<i64, RuntimeError> {
        value
            .as_int()
            .ok_or_else(|| self.type_error("int", value.type_name()))
    }

    fn sequence(&self, value: Value) -> Result<Sequence, RuntimeError> {
        match value {
            Value::Tuple(items) => Ok(Sequence::Tuple(items)),
            Value::String(s) => Ok(Sequence::String(s.chars().collect())),
            other => Err(self.type_error("tuple or str", other.type_name())),
        }
    }

    fn arity(&self, expected: &str, got: usize) -> RuntimeError {
        RuntimeError::ArityMismatch {
            receiver: self.name().to_string(),
            expected: expected.to_string(),
            got,
        }
    }

    fn type_error(&self, expected: &str, actual: &str) -> RuntimeError {
        RuntimeError::TypeMismatch {
            context: self.name().to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Sequences
// ============================================================================

/// Indexable view over a tuple or a string.
enum Sequence {
    Tuple(Vec<Value>),
    String(Vec<char>),
}

impl Sequence {
    fn len(&self) -> usize {
        match self {
            Sequence::Tuple(items) => items.len(),
            Sequence::String(chars) => chars.len(),
        }
    }

    fn element(mut self, index: usize) -> Value {
        match &mut self {
            Sequence::Tuple(items) => items.swap_remove(index),
            Sequence::String(chars) => Value::String(chars[index].to_string()),
        }
    }

    /// Python slice semantics, negative bounds included.
    fn slice(
        self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Value, RuntimeError> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(RuntimeError::TypeMismatch {
                context: "Slice".into(),
                expected: "non-zero step".into(),
                actual: "0".into(),
            });
        }
        let len = self.len() as i64;
        let clamp = |bound: Option<i64>, default: i64| -> i64 {
            match bound {
                None => default,
                Some(b) if b < 0 => {
                    let b = b + len;
                    if step > 0 { b.max(0) } else { b.max(-1) }
                }
                Some(b) => {
                    if step > 0 { b.min(len) } else { b.min(len - 1) }
                }
            }
        };
        let (start, stop) = if step > 0 {
            (clamp(start, 0), clamp(stop, len))
        } else {
            (clamp(start, len - 1), clamp(stop, -1))
        };

        let mut indices = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            indices.push(i as usize);
            i += step;
        }

        Ok(match self {
            Sequence::Tuple(items) => {
                Value::Tuple(indices.into_iter().map(|i| items[i].clone()).collect())
            }
            Sequence::String(chars) => {
                Value::String(indices.into_iter().map(|i| chars[i]).collect())
            }
        })
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if index < 0 { index + len } else { index };
    (0..len).contains(&i).then_some(i as usize)
}

/// Integral floats become ints, matching `ToNum`.
fn collapse_integral(number: f64) -> Value {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 9.2e18 {
        Value::Int(number as i64)
    } else {
        Value::Float(number)
    }
}

/// `str.format` with the whole argument tuple as positional argument 0.
fn format_positional(format: &str, args: &Value) -> String {
    let rendered = args.to_string();
    let mut out = String::with_capacity(format.len() + rendered.len());
    let mut rest = format;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with("{}") {
            out.push_str(&rendered);
            rest = &tail[2..];
        } else if tail.starts_with("{0}") {
            out.push_str(&rendered);
            rest = &tail[3..];
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
