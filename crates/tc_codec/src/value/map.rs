use core::fmt;

use crate::hash::{FixedHashState, HashMap};
use crate::value::Value;

/// A text-keyed map that remembers insertion order.
///
/// Encoding a record yields its fields in field order, and iteration follows
/// that order. Equality ignores order.
///
/// Inserting an existing key replaces its value in place.
#[derive(Clone, Default)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl ValueMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::with_hasher(FixedHashState),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&at) => Some(core::mem::replace(&mut self.entries[at].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&at| &self.entries[at].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.index.get(key).map(|&at| &mut self.entries[at].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove `key`, keeping the order of the other entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let at = self.index.remove(key)?;
        let (_, value) = self.entries.remove(at);
        for (_, slot) in self.index.iter_mut() {
            if *slot > at {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ValueMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ValueMap;
    use crate::Value;

    #[test]
    fn keeps_insertion_order() {
        let mut map = ValueMap::new();
        map.insert("b", 1u8);
        map.insert("a", 2u8);
        map.insert("c", 3u8);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a", "c"]);

        assert_eq!(map.insert("a", 4u8), Some(Value::U8(2)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a", "c"]);

        assert_eq!(map.remove("b"), Some(Value::U8(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(map.get("c"), Some(&Value::U8(3)));
        assert_eq!(map.remove("b"), None);
    }

    #[test]
    fn equality_ignores_order() {
        let a: ValueMap = [("x", 1u8), ("y", 2u8)].into_iter().collect();
        let b: ValueMap = [("y", 2u8), ("x", 1u8)].into_iter().collect();
        let c: ValueMap = [("y", 2u8)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(c, a);
    }
}
