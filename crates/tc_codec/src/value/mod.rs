//! The generic representation produced by encoding and consumed by decoding.
//!
//! A [`Value`] is an in-memory tree of scalars, sequences and text-keyed maps.
//! It is not a wire format, but implements `serde_core::Serialize` and
//! `serde_core::Deserialize` so it can be handed to any serde format.

// -----------------------------------------------------------------------------
// Modules

mod map;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use map::ValueMap;

// -----------------------------------------------------------------------------
// Value

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use num_complex::{Complex32, Complex64};

/// A loosely typed value.
///
/// Numbers keep the exact width and signedness of the native value they were
/// encoded from. [`Value::Any`] carries a payload the converter never looks
/// into, used for polymorphic and opaque fields; two `Any` values are equal
/// only when they share the same allocation.
///
/// # Examples
///
/// ```
/// use tc_codec::{Value, ValueMap};
///
/// let mut map = ValueMap::new();
/// map.insert("name", "bryn");
/// map.insert("age", 29u32);
///
/// let value = Value::from(map);
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("age"), Some(&Value::U32(29)));
/// assert_eq!(map.get("name").and_then(Value::as_str), Some("bryn"));
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex32(Complex32),
    Complex64(Complex64),
    Char(char),
    Str(String),
    Seq(Vec<Value>),
    Map(ValueMap),
    Any(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary payload in [`Value::Any`].
    #[inline]
    pub fn any<T: Any + Send + Sync>(payload: T) -> Self {
        Self::Any(Arc::new(payload))
    }

    #[inline]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Whether this is `Nil`, `false`, a numeric zero (complex included), `'\0'`
    /// or empty text.
    ///
    /// Sequences, maps and `Any` payloads are never zero, even when empty:
    /// only the absence of a container (`Nil`) is.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Bool(v) => !*v,
            Self::I8(v) => *v == 0,
            Self::I16(v) => *v == 0,
            Self::I32(v) => *v == 0,
            Self::I64(v) => *v == 0,
            Self::I128(v) => *v == 0,
            Self::Isize(v) => *v == 0,
            Self::U8(v) => *v == 0,
            Self::U16(v) => *v == 0,
            Self::U32(v) => *v == 0,
            Self::U64(v) => *v == 0,
            Self::U128(v) => *v == 0,
            Self::Usize(v) => *v == 0,
            Self::F32(v) => *v == 0.0,
            Self::F64(v) => *v == 0.0,
            Self::Complex32(v) => v.re == 0.0 && v.im == 0.0,
            Self::Complex64(v) => v.re == 0.0 && v.im == 0.0,
            Self::Char(v) => *v == '\0',
            Self::Str(v) => v.is_empty(),
            Self::Seq(_) | Self::Map(_) | Self::Any(_) => false,
        }
    }

    /// A short name of the variant, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::I128(_) => "i128",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Complex32(_) => "complex32",
            Self::Complex64(_) => "complex64",
            Self::Char(_) => "char",
            Self::Str(_) => "str",
            Self::Seq(_) => "seq",
            Self::Map(_) => "map",
            Self::Any(_) => "any",
        }
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn into_seq(self) -> Result<Vec<Value>, Self> {
        match self {
            Self::Seq(v) => Ok(v),
            other => Err(other),
        }
    }

    #[inline]
    pub fn into_map(self) -> Result<ValueMap, Self> {
        match self {
            Self::Map(v) => Ok(v),
            other => Err(other),
        }
    }

    /// Downcast the payload of [`Value::Any`].
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Any(payload) => payload.downcast_ref(),
            _ => None,
        }
    }

    /// Any integer variant, widened to `i128`. `None` for `u128` values out of range.
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v.into(),
            Self::I128(v) => v,
            Self::Isize(v) => v as i128,
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v.into(),
            Self::U128(v) => return i128::try_from(v).ok(),
            Self::Usize(v) => v as i128,
            _ => return None,
        })
    }

    /// Any non-negative integer variant, widened to `u128`.
    pub fn as_u128(&self) -> Option<u128> {
        match *self {
            Self::U128(v) => Some(v),
            _ => self.as_i128().and_then(|v| u128::try_from(v).ok()),
        }
    }

    /// Any complex variant widened to `Complex64`, or a real number as
    /// [`as_f64`](Self::as_f64) reads it, with a zero imaginary part.
    pub fn as_complex64(&self) -> Option<Complex64> {
        match *self {
            Self::Complex32(v) => Some(Complex64::new(v.re.into(), v.im.into())),
            Self::Complex64(v) => Some(v),
            _ => self.as_f64().map(|re| Complex64::new(re, 0.0)),
        }
    }

    /// Any float variant, or an integer that a `f64` holds exactly.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v.into()),
            Self::F64(v) => Some(v),
            _ => {
                let int = self.as_i128()?;
                let float = int as f64;
                (float as i128 == int).then_some(float)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I128(a), Self::I128(b)) => a == b,
            (Self::Isize(a), Self::Isize(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U128(a), Self::U128(b)) => a == b,
            (Self::Usize(a), Self::Usize(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Complex32(a), Self::Complex32(b)) => a == b,
            (Self::Complex64(a), Self::Complex64(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Any(a), Self::Any(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::I128(v) => f.debug_tuple("I128").field(v).finish(),
            Self::Isize(v) => f.debug_tuple("Isize").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::U128(v) => f.debug_tuple("U128").field(v).finish(),
            Self::Usize(v) => f.debug_tuple("Usize").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::Complex32(v) => f.debug_tuple("Complex32").field(v).finish(),
            Self::Complex64(v) => f.debug_tuple("Complex64").field(v).finish(),
            Self::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Seq(v) => f.debug_tuple("Seq").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Any(_) => f.write_str("Any(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// From

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    )*};
}

impl_from! {
    bool => Bool,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize,
    f32 => F32, f64 => F64,
    Complex32 => Complex32, Complex64 => Complex64,
    char => Char,
    String => Str,
    Vec<Value> => Seq,
    ValueMap => Map,
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}
