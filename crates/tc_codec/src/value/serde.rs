use core::fmt::{self, Formatter};

use serde_core::de::{Deserialize, Deserializer, Error as _, MapAccess, SeqAccess, Unexpected, Visitor};
use serde_core::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::value::{Value, ValueMap};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::I8(v) => serializer.serialize_i8(*v),
            Self::I16(v) => serializer.serialize_i16(*v),
            Self::I32(v) => serializer.serialize_i32(*v),
            Self::I64(v) => serializer.serialize_i64(*v),
            Self::I128(v) => serializer.serialize_i128(*v),
            Self::Isize(v) => serializer.serialize_i64(*v as i64),
            Self::U8(v) => serializer.serialize_u8(*v),
            Self::U16(v) => serializer.serialize_u16(*v),
            Self::U32(v) => serializer.serialize_u32(*v),
            Self::U64(v) => serializer.serialize_u64(*v),
            Self::U128(v) => serializer.serialize_u128(*v),
            Self::Usize(v) => serializer.serialize_u64(*v as u64),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::Complex32(v) => serializer.collect_seq([v.re, v.im]),
            Self::Complex64(v) => serializer.collect_seq([v.re, v.im]),
            Self::Char(v) => serializer.serialize_char(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::Seq(v) => serializer.collect_seq(v),
            Self::Map(v) => v.serialize(serializer),
            Self::Any(_) => Err(S::Error::custom(
                "`Value::Any` carries an unconverted payload and cannot be serialized",
            )),
        }
    }
}

impl Serialize for ValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

/// Upper bound on the capacity reserved from a `size_hint`.
const MAX_PREALLOCATION: usize = 4096;

#[inline]
fn capacity(size_hint: Option<usize>) -> usize {
    size_hint.map_or(0, |len| len.min(MAX_PREALLOCATION))
}

macro_rules! visit_scalars {
    ($($method:ident: $ty:ty => $variant:ident),* $(,)?) => {$(
        #[inline]
        fn $method<E>(self, v: $ty) -> Result<Self::Value, E> {
            Ok(Value::$variant(v))
        }
    )*};
}

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("any scalar, sequence or string-keyed map")
    }

    visit_scalars! {
        visit_bool: bool => Bool,
        visit_i8: i8 => I8,
        visit_i16: i16 => I16,
        visit_i32: i32 => I32,
        visit_i64: i64 => I64,
        visit_i128: i128 => I128,
        visit_u8: u8 => U8,
        visit_u16: u16 => U16,
        visit_u32: u32 => U32,
        visit_u64: u64 => U64,
        visit_u128: u128 => U128,
        visit_f32: f32 => F32,
        visit_f64: f64 => F64,
        visit_char: char => Char,
        visit_string: String => Str,
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::Str(v.into()))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Nil)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(capacity(seq.size_hint()));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = ValueMap::with_capacity(capacity(map.size_hint()));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for ValueMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match deserializer.deserialize_map(ValueVisitor)? {
            Value::Map(map) => Ok(map),
            other => Err(D::Error::invalid_type(
                Unexpected::Other(other.type_name()),
                &"a string-keyed map",
            )),
        }
    }
}
