//! Navigation keys.

use std::fmt;

use super::Value;
use crate::error::{Error, Result};

/// One navigation step into a [`Value`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A field name.
    Name(String),
    /// An element position.
    Index(usize),
}

impl Key {
    pub(crate) fn is_length(&self) -> bool {
        matches!(self, Self::Name(name) if name == "length")
    }

    /// The element position this key addresses, if any.
    ///
    /// Numeric names address elements too, so `"0"` and `0` agree.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Name(name) => name.parse().ok(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        usize::try_from(index).map_or_else(|_| Self::Name(index.to_string()), Self::Index)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl TryFrom<Value> for Key {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(Self::Index(n as usize))
            }
            other => Err(Error::invalid_operation(format!(
                "{other} cannot be used as a key"
            ))),
        }
    }
}
