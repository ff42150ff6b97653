use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use crate::convert::{CodecError, Context};
use crate::impls::{conversion_error, set_boxed};
use crate::info::{GenericTypeInfoCell, TypeInfo};
use crate::value::{Value, ValueMap};
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Helpers

/// Encode entries into a `Map`; keys that do not encode to `Str` are rejected.
///
/// With `sorted`, entries are emitted in key order.
fn entries_to_value<'a, K: Typed, V: Native>(
    entries: impl ExactSizeIterator<Item = (&'a K, &'a V)>,
    sorted: bool,
    cx: &Context<'_>,
) -> Result<Value, CodecError> {
    let mut out = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let Value::Str(key) = key.to_value(cx)? else {
            return Err(CodecError::NonTextKey {
                key_type: K::type_info().type_path(),
            });
        };
        out.push((key, value));
    }

    if sorted {
        out.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    }

    let mut map = ValueMap::with_capacity(out.len());
    for (key, value) in out {
        map.insert(key, value.to_value(cx)?);
    }
    Ok(Value::Map(map))
}

/// Decode the entries of a `Map`, `Nil` yields no entries.
fn entries_from_value<K: Typed, V: Typed>(
    value: Value,
    cx: &Context<'_>,
    info: &'static TypeInfo,
) -> Result<Vec<(K, V)>, CodecError> {
    let map = match value {
        Value::Map(map) => map,
        Value::Nil => return Ok(Vec::new()),
        other => return Err(conversion_error(&other, info)),
    };

    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        let mut native_key = K::zero();
        native_key.apply_value(Value::Str(key), cx)?;
        let mut native_value = V::zero();
        native_value.apply_value(value, cx)?;
        out.push((native_key, native_value));
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Hash maps

macro_rules! impl_hash_map {
    ($($map:ident)::+) => {
        impl<K, V, S> Typed for $($map)::+<K, V, S>
        where
            K: Typed + Eq + Hash,
            V: Typed,
            S: BuildHasher + Default + Send + Sync + 'static,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(TypeInfo::map::<Self, K, V>)
            }

            #[inline]
            fn zero() -> Self {
                Self::default()
            }
        }

        impl<K, V, S> Native for $($map)::+<K, V, S>
        where
            K: Typed + Eq + Hash,
            V: Typed,
            S: BuildHasher + Default + Send + Sync + 'static,
        {
            #[inline]
            fn native_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn is_zero(&self) -> bool {
                self.is_empty()
            }

            fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
                entries_to_value(self.iter(), true, cx)
            }

            fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
                *self = entries_from_value::<K, V>(value, cx, Self::type_info())?
                    .into_iter()
                    .collect();
                Ok(())
            }

            #[inline]
            fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
                set_boxed(self, value)
            }
        }
    };
}

impl_hash_map!(std::collections::HashMap);
impl_hash_map!(hashbrown::HashMap);

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: Typed + Ord, V: Typed> Typed for BTreeMap<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::map::<Self, K, V>)
    }

    #[inline]
    fn zero() -> Self {
        BTreeMap::new()
    }
}

impl<K: Typed + Ord, V: Typed> Native for BTreeMap<K, V> {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
        entries_to_value(self.iter(), false, cx)
    }

    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
        *self = entries_from_value::<K, V>(value, cx, Self::type_info())?
            .into_iter()
            .collect();
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::hash::HashMap as FixedHashMap;
    use crate::{CodecError, Registry, Value, convert};

    #[test]
    fn hash_map_keys_are_sorted() {
        let registry = Registry::new();
        let native: HashMap<String, u8> = [("b", 2), ("c", 3), ("a", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();

        let value = convert::to_value(&native, "ns", &registry).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(map.get("b"), Some(&Value::U8(2)));

        let back: HashMap<String, u8> = convert::from_value(value, "ns", &registry).unwrap();
        assert_eq!(back, native);
    }

    #[test]
    fn non_text_keys_are_rejected() {
        let registry = Registry::new();
        let native: BTreeMap<u32, String> = [(1, String::from("one"))].into();
        let err = convert::to_value(&native, "ns", &registry).unwrap_err();
        assert!(matches!(err, CodecError::NonTextKey { key_type: "u32" }));

        let mut native = FixedHashMap::default();
        native.insert('k', 1u8);
        let err = convert::to_value(&native, "ns", &registry).unwrap_err();
        assert!(matches!(err, CodecError::NonTextKey { key_type: "char" }));
    }

    #[test]
    fn empty_maps_encode_as_empty() {
        let registry = Registry::new();
        let native: BTreeMap<String, u8> = BTreeMap::new();
        let value = convert::to_value(&native, "ns", &registry).unwrap();
        assert_eq!(value, Value::Map(Default::default()));
    }

    #[test]
    fn values_decode_recursively() {
        let registry = Registry::new();
        let value = Value::Map(
            [("xs", Value::Seq(vec![Value::U64(1), Value::U64(2)]))]
                .into_iter()
                .collect(),
        );
        let back: FixedHashMap<String, Vec<u16>> =
            convert::from_value(value, "ns", &registry).unwrap();
        assert_eq!(back.get("xs").map(Vec::as_slice), Some(&[1, 2][..]));
    }
}
