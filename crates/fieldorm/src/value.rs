//! Literal values bound to `?` placeholders.
//!
//! Every literal that reaches an engine is a [`Value`]. Record fields convert
//! to and from values through [`ColumnValue`], which the derive macros rely on
//! to describe each field's [`ValueKind`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A single bound argument (or a cell read back from an engine).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    /// Only produced by engines for NULL cells.
    Null,
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::Bool(_) => "bool",
            Value::Time(_) => "time",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Null => f.write_str("NULL"),
        }
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

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

/// Runtime kind of a record field, as seen by binding validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int64,
    Int32,
    /// Platform-sized integer (`isize`).
    Int,
    Bool,
    Float64,
    String,
    Time,
}

/// Conversion between a Rust field type and a [`Value`].
///
/// `Default` doubles as the zero value: a missing column decodes to it, and a
/// `DateTime<Utc>` equal to its default (the Unix epoch) counts as "unset" for
/// auto-filled timestamps.
pub trait ColumnValue: Default + Send + Sync + Sized + 'static {
    const KIND: ValueKind;

    fn to_value(&self) -> Value;

    /// Decode from a cell. `Null` yields the default value.
    fn from_value(value: Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {expected}, got {}", got.type_name())
}

impl ColumnValue for i64 {
    const KIND: ValueKind = ValueKind::Int64;

    fn to_value(&self) -> Value {
        Value::Int64(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(0),
            v => v.as_i64().ok_or_else(|| mismatch("int64", &v)),
        }
    }
}

impl ColumnValue for i32 {
    const KIND: ValueKind = ValueKind::Int32;

    fn to_value(&self) -> Value {
        Value::Int32(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(0),
            v => {
                let wide = v.as_i64().ok_or_else(|| mismatch("int32", &v))?;
                i32::try_from(wide).map_err(|_| format!("value {wide} out of range for int32"))
            }
        }
    }
}

impl ColumnValue for isize {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int64(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(0),
            v => {
                let wide = v.as_i64().ok_or_else(|| mismatch("int", &v))?;
                isize::try_from(wide).map_err(|_| format!("value {wide} out of range for isize"))
            }
        }
    }
}

impl ColumnValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(false),
            v => v.as_i64().map(|n| n != 0).ok_or_else(|| mismatch("bool", &v)),
        }
    }
}

impl ColumnValue for f64 {
    const KIND: ValueKind = ValueKind::Float64;

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(0.0),
            Value::Float64(v) => Ok(v),
            Value::Int64(v) => Ok(v as f64),
            Value::Int32(v) => Ok(f64::from(v)),
            v => Err(mismatch("float64", &v)),
        }
    }
}

impl ColumnValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(v) => Ok(v),
            v => Err(mismatch("string", &v)),
        }
    }
}

impl ColumnValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Time;

    fn to_value(&self) -> Value {
        Value::Time(*self)
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(DateTime::<Utc>::default()),
            Value::Time(v) => Ok(v),
            v => Err(mismatch("time", &v)),
        }
    }
}

/// True when `value` is the zero timestamp (Unix epoch).
pub fn is_zero_time(value: &Value) -> bool {
    matches!(value, Value::Time(t) if *t == DateTime::<Utc>::default())
}
