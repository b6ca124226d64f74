//! Nested-path traversal.

use super::{Key, Value};

/// Walk `keys` through `root`.
///
/// Stops at the first `Null` or `Undefined` along the way and yields
/// `Undefined`; never fails.
///
/// ```rust
/// use linkwise::value::{traverse, Key, Value};
/// use serde_json::json;
///
/// let root = Value::from(json!({"a": {"b": 3}}));
/// assert_eq!(traverse(&root, &[Key::from("a"), Key::from("b")]), Value::from(3));
/// assert_eq!(traverse(&root, &[Key::from("x"), Key::from("b")]), Value::Undefined);
/// ```
#[must_use]
pub fn traverse(root: &Value, keys: &[Key]) -> Value {
    let mut current = root.clone();
    for key in keys {
        if current.is_nullish() {
            return Value::Undefined;
        }
        current = current.index(key);
    }
    current
}

/// An ordered list of keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    /// Create a path from key-like items.
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        keys.into_iter().collect()
    }

    /// The keys in order.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` for the empty path, which traverses to the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Append a key.
    #[must_use]
    pub fn push(mut self, key: impl Into<Key>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Walk this path through `root`. See [`traverse`].
    #[must_use]
    pub fn traverse(&self, root: &Value) -> Value {
        traverse(root, &self.keys)
    }
}

impl<K: Into<Key>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
