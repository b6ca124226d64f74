// Numbers are stored as f64; wider integers round to the nearest double.
#![allow(clippy::cast_precision_loss, clippy::cast_lossless)]

//! Conversions between Rust types and [`Value`].

use std::collections::BTreeMap;

use super::{integral, Function, Value};
use crate::error::{Error, Result};

macro_rules! number_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Undefined
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Object(fields)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items),
            serde_json::Value::Object(fields) => Value::Object(
                fields.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// Typed extraction from a [`Value`].
///
/// Closures passed to `apply`, `map` and `filter` name the type they want;
/// the subject is converted before the closure runs.
///
/// ```rust
/// use linkwise::value::{FromValue, Value};
///
/// assert_eq!(i64::from_value(Value::from(7)).unwrap(), 7);
/// assert!(i64::from_value(Value::from("7")).is_err());
/// ```
pub trait FromValue: Sized {
    /// Convert, failing when the shape does not fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] describing the mismatch.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &str, found: &Value) -> Error {
    Error::invalid_operation(format!(
        "expected {expected}, found {} {found}",
        found.type_name()
    ))
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch("number", &value))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        #[allow(clippy::cast_possible_truncation)]
        f64::from_value(value).map(|n| n as f32)
    }
}

macro_rules! integer_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self> {
                    value
                        .as_f64()
                        .and_then(integral)
                        .and_then(|i| <$t>::try_from(i).ok())
                        .ok_or_else(|| mismatch(stringify!($t), &value))
                }
            }
        )*
    };
}

integer_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromValue for Function {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Function(f) => Ok(f),
            other => Err(mismatch("function", &other)),
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(fields),
            other => Err(mismatch("object", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        if value.is_nullish() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self> {
        serde_json::to_value(&value)
            .map_err(|e| Error::invalid_operation(format!("cannot convert {value} to JSON: {e}")))
    }
}
