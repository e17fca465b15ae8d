//! Runtime values and bundles.
//!
//! Values follow the host (Python) data model closely enough that the
//! reference evaluator and the emitted Python agree: integers and floats are
//! distinct, tuples are the only aggregate, and `str()` rendering matches.

use std::cmp::Ordering;
use std::fmt;

use fleaux_core::RuntimeError;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    Tuple(Vec<Value>),
}

impl Value {
    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Bool(_) => "bool",
            Value::Null => "None",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Try to view this value as an f64. Booleans count as 0/1.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Try to view this value as an integer index or count.
    ///
    /// Floats qualify only when integral.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(v) => Some(*v as i64),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    /// Check if this value is a number (booleans included).
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    /// Python truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bool(v) => *v,
            Value::Null => false,
            Value::Tuple(items) => !items.is_empty(),
        }
    }

    /// Spread into a bundle: a tuple gives its items, anything else is a 1-bundle.
    pub fn into_bundle(self) -> Bundle {
        match self {
            Value::Tuple(items) => Bundle(items),
            other => Bundle(vec![other]),
        }
    }

    /// Python `repr()`.
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => python_str_repr(s),
            other => other.to_string(),
        }
    }

    /// Structural equality with numeric cross-type comparison (`1 == 1.0`).
    pub fn py_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y))
            }
            (Value::Int(a), Value::Int(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.as_float() == b.as_float(),
            _ => false,
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`.
    pub fn py_cmp(&self, other: &Value) -> Result<Ordering, RuntimeError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (Value::Tuple(a), Value::Tuple(b)) => {
                for (x, y) in a.iter().zip(b) {
                    if !x.py_eq(y) {
                        return x.py_cmp(y);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            (a, b) if a.is_number() && b.is_number() => {
                let (x, y) = (a.as_float().unwrap_or(0.0), b.as_float().unwrap_or(0.0));
                x.partial_cmp(&y).ok_or_else(|| RuntimeError::TypeMismatch {
                    context: "comparison".into(),
                    expected: "ordered numbers".into(),
                    actual: "nan".into(),
                })
            }
            (a, b) => Err(RuntimeError::TypeMismatch {
                context: "comparison".into(),
                expected: a.type_name().into(),
                actual: b.type_name().into(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.py_eq(other)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Python `str()`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", python_float_repr(*v)),
            Value::String(s) => write!(f, "{s}"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Null => write!(f, "None"),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.repr())?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn python_float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let debug = format!("{v:?}");
    // Python always signs the exponent and pads it to two digits: 1e+20, 1.5e-07
    match debug.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => debug,
    }
}

fn python_str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

// ============================================================================
// Bundles
// ============================================================================

/// The argument convention of every pipe receiver: a fixed-size ordered
/// sequence of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bundle(pub Vec<Value>);

impl Bundle {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }

    pub fn into_items(self) -> Vec<Value> {
        self.0
    }

    /// Collapse back into one value: a 1-bundle is its element, anything
    /// else becomes a tuple.
    pub fn into_value(mut self) -> Value {
        if self.0.len() == 1 {
            self.0.remove(0)
        } else {
            Value::Tuple(self.0)
        }
    }
}

impl From<Vec<Value>> for Bundle {
    fn from(items: Vec<Value>) -> Self {
        Bundle(items)
    }
}
