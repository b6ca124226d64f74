//! Dynamic subject values.
//!
//! A chain navigates into its subject by key, by path, by method name, and
//! by element, without knowing the subject's shape up front. Subjects are
//! therefore carried as a dynamic [`Value`]:
//!
//! - [`Value`] - the value tree itself, with deep equality and a JSON-like
//!   [`Display`](std::fmt::Display)
//! - [`Key`] - one navigation step (a field name or an element index)
//! - [`Path`] - an ordered list of keys, see [`traverse`]
//! - [`Function`] - a callable stored inside a value
//! - [`FromValue`] - typed extraction used by closures in the chain
//!
//! # Example
//!
//! ```rust
//! use linkwise::value::{Key, Value};
//! use serde_json::json;
//!
//! let value = Value::from(json!({"user": {"name": "ada"}}));
//! let name = value
//!     .index(&Key::from("user"))
//!     .index(&Key::from("name"));
//! assert_eq!(name, Value::from("ada"));
//! ```

mod convert;
mod key;
mod path;

pub use convert::FromValue;
pub use key::Key;
pub use path::{traverse, Path};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

type Callable = dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync;

/// A callable stored inside a [`Value`].
///
/// Functions receive the value they were looked up on (`this`) and the
/// invocation arguments. Two functions are equal only if they are the same
/// allocation.
#[derive(Clone)]
pub struct Function(Arc<Callable>);

impl Function {
    /// Wrap an infallible closure.
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self(Arc::new(move |this: &Value, args: &[Value]| Ok(f(this, args).into())))
    }

    /// Wrap a closure that can fail.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Call the function bound to `this`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the wrapped closure raises.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        (self.0)(this, args)
    }

    /// Returns `true` if both handles point to the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// A dynamically shaped subject.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value at all, the result of reading a missing key.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. Integers are stored as `f64`.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A record with string keys.
    Object(BTreeMap<String, Value>),
    /// A callable.
    Function(Function),
}

impl Value {
    /// Build an object from key/value pairs.
    ///
    /// ```rust
    /// use linkwise::value::Value;
    ///
    /// let point = Value::object([("x", 1), ("y", 2)]);
    /// assert_eq!(point.to_string(), r#"{"x":1,"y":2}"#);
    /// ```
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from anything convertible into values.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a function value from an infallible closure.
    pub fn function<F, V>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::Function(Function::new(f))
    }

    /// Convert any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if `value` cannot be represented
    /// as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| Error::invalid_operation(format!("cannot convert to a value: {e}")))
    }

    /// Decode into any deserializable type.
    ///
    /// `Undefined` and functions decode as null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the shape does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::to_value(self)
            .and_then(serde_json::from_value)
            .map_err(|e| Error::invalid_operation(format!("cannot decode {self}: {e}")))
    }

    /// Returns `true` for `Null` and `Undefined`.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Name of the variant, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }

    /// The number, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The string slice, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The fields, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The function, if this is a function.
    #[must_use]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Read `self[key]`.
    ///
    /// Total: any key that does not resolve yields `Undefined`, including
    /// reads on `Null` and `Undefined`.
    #[must_use]
    pub fn index(&self, key: &Key) -> Value {
        match (self, key) {
            (Self::Object(fields), Key::Name(name)) => {
                fields.get(name).cloned().unwrap_or_default()
            }
            (Self::Object(fields), Key::Index(i)) => {
                fields.get(&i.to_string()).cloned().unwrap_or_default()
            }
            (Self::Array(_) | Self::String(_), _) if key.is_length() => {
                Value::from(self.length().unwrap_or_default())
            }
            (Self::Array(items), key) => key
                .position()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default(),
            (Self::String(s), key) => key
                .position()
                .and_then(|i| s.chars().nth(i))
                .map_or(Value::Undefined, |c| Value::String(c.to_string())),
            _ => Value::Undefined,
        }
    }

    /// Read `self[key]`, refusing to read through nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if `self` is `Null` or
    /// `Undefined`.
    pub fn get(&self, key: &Key) -> Result<Value> {
        if self.is_nullish() {
            return Err(Error::invalid_operation(format!(
                "cannot read property `{key}` of {self}"
            )));
        }
        Ok(self.index(key))
    }

    fn length(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            Self::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Structural equality.
    ///
    /// Arrays and objects compare element by element, numbers by value with
    /// `NaN` equal to itself, functions by identity.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
            }
            (Self::Object(a), Self::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.deep_eq(w)))
            }
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

fn integral(n: f64) -> Option<i64> {
    #[allow(clippy::cast_possible_truncation)]
    (n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER).then(|| n as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Self::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(f, "{quoted}:{value}")?;
                }
                f.write_str("}")
            }
            Self::Function(_) => f.write_str("[Function]"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null | Self::Function(_) => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(fields) => serializer.collect_map(fields),
        }
    }
}
