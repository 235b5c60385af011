//! Dynamic values exchanged between presentation models and components.

use std::convert::Infallible;
use std::fmt;

use thiserror::Error;

// ── Value ─────────────────────────────────────────────────────────────────

/// A property or aspect value as seen by the binding core.
///
/// Getters registered through [`crate::introspect::ClassBuilder`] convert
/// their return type into a `Value`; setters convert back with `TryFrom`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Human-readable name of the variant, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ValueError::mismatch("bool", other)),
        }
    }

    /// Unwraps a list; `Null` counts as the empty list.
    pub fn into_list(self) -> Result<Vec<Value>, ValueError> {
        match self {
            Value::List(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(ValueError::mismatch("list", &other)),
        }
    }

    /// Text shown for this value in captions, labels and tooltips.
    /// `Null` renders as the empty string.
    pub fn to_display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ── ValueError ────────────────────────────────────────────────────────────

/// A `Value` could not be converted into the requested Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected} value, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} does not fit into {target}")]
    OutOfRange { value: i64, target: &'static str },
}

impl ValueError {
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        ValueError::Mismatch {
            expected,
            found: found.kind(),
        }
    }
}

impl From<Infallible> for ValueError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

// ── Rust → Value ──────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

// ── Value → Rust ──────────────────────────────────────────────────────────

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        v.as_bool()
    }
}

impl TryFrom<Value> for i64 {
    type Error = ValueError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Int(i) => Ok(i),
            other => Err(ValueError::mismatch("int", &other)),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = ValueError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        let wide = i64::try_from(v)?;
        i32::try_from(wide).map_err(|_| ValueError::OutOfRange {
            value: wide,
            target: "i32",
        })
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(ValueError::mismatch("float", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Str(s) => Ok(s),
            other => Err(ValueError::mismatch("string", &other)),
        }
    }
}

macro_rules! optional_try_from {
    ($($t:ty),*) => {
        $(
            impl TryFrom<Value> for Option<$t> {
                type Error = ValueError;

                fn try_from(v: Value) -> Result<Self, Self::Error> {
                    match v {
                        Value::Null => Ok(None),
                        other => <$t>::try_from(other).map(Some),
                    }
                }
            }
        )*
    };
}

optional_try_from!(bool, i64, i32, f64, String);
