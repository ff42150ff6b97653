//! The recursive value converter.
//!
//! Conversion is dispatched through [`Native::to_value`] and
//! [`Native::apply_value`]; this module holds the shared pieces: the
//! [`Context`] threaded through the recursion, the error type and the
//! entry points.
//!
//! # Encode
//!
//! Scalars keep their width, sequences become [`Value::Seq`], maps become
//! [`Value::Map`] (keys must encode to text), references are collapsed,
//! records are encoded by a [`Transcoder`] bound to the active namespace.
//!
//! # Decode
//!
//! Integers convert losslessly between widths, integers convert to floats
//! when exact, [`Value::Nil`] decodes to the zero value of any type. Any other
//! mismatch is a [`CodecError::Conversion`].

// -----------------------------------------------------------------------------
// Modules

mod error;

// -----------------------------------------------------------------------------
// Exports

pub use error::{BoxError, CodecError};

// -----------------------------------------------------------------------------
// Context

use crate::registry::Registry;
use crate::transcoder::Transcoder;
use crate::value::Value;
use crate::{Native, Typed};

/// The registry and the active namespace of one conversion.
///
/// The namespace changes when recursing into a field annotated `@tag=...`.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    registry: &'a Registry,
    namespace: &'a str,
}

impl<'a> Context<'a> {
    #[inline]
    pub const fn new(registry: &'a Registry, namespace: &'a str) -> Self {
        Self {
            registry,
            namespace,
        }
    }

    #[inline]
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline]
    pub const fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// The same registry with another namespace.
    #[inline]
    pub const fn with_namespace<'b>(&self, namespace: &'b str) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            registry: self.registry,
            namespace,
        }
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Encode any native value.
///
/// ```
/// use tc_codec::{Registry, Value, convert};
///
/// let registry = Registry::new();
/// let value = convert::to_value(&vec![1u8, 2], "ns", &registry).unwrap();
/// assert_eq!(value, Value::Seq(vec![Value::U8(1), Value::U8(2)]));
/// ```
pub fn to_value(native: &dyn Native, namespace: &str, registry: &Registry) -> Result<Value, CodecError> {
    native.to_value(&Context::new(registry, namespace))
}

/// Decode `value` into a new `T`.
///
/// ```
/// use tc_codec::{Registry, Value, convert};
///
/// let registry = Registry::new();
/// let value = Value::Seq(vec![Value::U8(1), Value::U64(2)]);
/// let out: Vec<u32> = convert::from_value(value, "ns", &registry).unwrap();
/// assert_eq!(out, [1, 2]);
/// ```
pub fn from_value<T: Typed>(value: Value, namespace: &str, registry: &Registry) -> Result<T, CodecError> {
    let mut out = T::zero();
    out.apply_value(value, &Context::new(registry, namespace))?;
    Ok(out)
}

// -----------------------------------------------------------------------------
// Records

/// Encode a record into a [`Value::Map`] using the context's namespace.
pub(crate) fn encode_record(record: &dyn Native, cx: &Context<'_>) -> Result<Value, CodecError> {
    Transcoder::for_type(cx.registry(), record.native_type_info(), cx.namespace())
        .encode(record)
        .map(Value::Map)
}

/// Decode the entries of a [`Value::Map`] into `record`.
///
/// `record` is expected to hold its zero value, `Nil` leaves it untouched.
pub(crate) fn decode_record(
    record: &mut dyn Native,
    value: Value,
    cx: &Context<'_>,
) -> Result<(), CodecError> {
    let info = record.native_type_info();
    match value {
        Value::Nil => Ok(()),
        Value::Map(map) => {
            Transcoder::for_type(cx.registry(), info, cx.namespace()).decode_into(record, map)
        }
        other => Err(CodecError::Conversion {
            from: other.type_name(),
            to: info.type_path(),
        }),
    }
}

/// Panics for a type the converter cannot handle.
#[cold]
#[track_caller]
pub(crate) fn unsupported(type_path: &str, expected: &str) -> ! {
    panic!("unsupported type `{type_path}`: expected {expected}")
}
