use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::convert::{CodecError, Context};
use crate::impls::{conversion_error, set_boxed};
use crate::info::{GenericTypeInfoCell, NonGenericTypeInfoCell, TypeInfo};
use crate::value::Value;
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// AnyValue

/// A field whose concrete type is only known at runtime.
///
/// The payload is passed through unconverted: encoding yields
/// [`Value::Any`], or the stored value itself when the payload is a
/// [`Value`]. Decoding stores whatever it is given, unwrapping
/// [`Value::Any`]. An empty `AnyValue` is zero and encodes to [`Value::Nil`].
///
/// # Examples
///
/// ```
/// use tc_codec::impls::AnyValue;
/// use tc_codec::{Registry, Value, convert};
///
/// let registry = Registry::new();
///
/// let value = convert::to_value(&AnyValue::new(7u8), "ns", &registry).unwrap();
/// assert_eq!(value.downcast_ref::<u8>(), Some(&7));
///
/// let any: AnyValue = convert::from_value(Value::from("x"), "ns", &registry).unwrap();
/// assert_eq!(any.as_value(), Some(&Value::from("x")));
/// ```
#[derive(Clone, Default)]
pub struct AnyValue(Option<Arc<dyn Any + Send + Sync>>);

impl AnyValue {
    /// An `AnyValue` holding `payload`.
    #[inline]
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Some(Arc::new(payload)))
    }

    /// An empty `AnyValue`.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The payload, if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|payload| payload.downcast_ref::<T>())
    }

    /// The payload, if it is a [`Value`].
    #[inline]
    pub fn as_value(&self) -> Option<&Value> {
        self.downcast_ref()
    }

    #[inline]
    pub fn payload(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.0.as_ref()
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.0, self.as_value()) {
            (None, _) => f.write_str("AnyValue(None)"),
            (Some(_), Some(value)) => f.debug_tuple("AnyValue").field(value).finish(),
            (Some(_), None) => f.write_str("AnyValue(..)"),
        }
    }
}

impl Typed for AnyValue {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(TypeInfo::polymorphic::<Self>)
    }

    #[inline]
    fn zero() -> Self {
        Self::empty()
    }
}

impl Native for AnyValue {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_value(&self, _cx: &Context<'_>) -> Result<Value, CodecError> {
        Ok(match (&self.0, self.as_value()) {
            (None, _) => Value::Nil,
            (Some(_), Some(value)) => value.clone(),
            (Some(payload), None) => Value::Any(Arc::clone(payload)),
        })
    }

    fn apply_value(&mut self, value: Value, _cx: &Context<'_>) -> Result<(), CodecError> {
        self.0 = match value {
            Value::Nil => None,
            Value::Any(payload) => Some(payload),
            other => Some(Arc::new(other)),
        };
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}

// -----------------------------------------------------------------------------
// Opaque

/// A value converted as a whole, passed through as [`Value::Any`].
///
/// Decoding accepts a [`Value::Any`] payload of exactly `T`, or `Nil`.
/// See [`impl_native_opaque!`](crate::impl_native_opaque) to make a type of
/// your own opaque without a wrapper.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Opaque<T>(pub T);

impl<T> Typed for Opaque<T>
where
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::opaque::<Self>)
    }

    #[inline]
    fn zero() -> Self {
        Self(T::default())
    }
}

impl<T> Native for Opaque<T>
where
    T: Clone + Default + PartialEq + Send + Sync + 'static,
{
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == T::default()
    }

    #[inline]
    fn to_value(&self, _cx: &Context<'_>) -> Result<Value, CodecError> {
        Ok(Value::any(self.0.clone()))
    }

    fn apply_value(&mut self, value: Value, _cx: &Context<'_>) -> Result<(), CodecError> {
        self.0 = match &value {
            Value::Nil => T::default(),
            _ => value
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| conversion_error(&value, Self::type_info()))?,
        };
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}

/// Implement [`Native`](crate::Native) for a type that converts as a whole.
///
/// The type must be `Clone + Default + PartialEq + Send + Sync + 'static`.
/// It encodes to [`Value::Any`](crate::Value::Any) and decodes from a
/// `Value::Any` payload of the same type; its default value is its zero value.
///
/// # Examples
///
/// ```
/// use tc_codec::{Registry, Value, convert, impl_native_opaque};
///
/// #[derive(Clone, Default, PartialEq)]
/// struct Handle(u64);
///
/// impl_native_opaque!(Handle);
///
/// let registry = Registry::new();
/// let value = convert::to_value(&Handle(7), "ns", &registry).unwrap();
/// assert_eq!(value.downcast_ref::<Handle>().map(|h| h.0), Some(7));
///
/// let back: Handle = convert::from_value(value, "ns", &registry).unwrap();
/// assert_eq!(back.0, 7);
/// ```
#[macro_export]
macro_rules! impl_native_opaque {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::NonGenericTypeInfoCell =
                    $crate::info::NonGenericTypeInfoCell::new();
                CELL.get_or_init($crate::info::TypeInfo::opaque::<Self>)
            }

            #[inline]
            fn zero() -> Self {
                <Self as ::core::default::Default>::default()
            }
        }

        impl $crate::Native for $ty {
            #[inline]
            fn native_type_info(&self) -> &'static $crate::info::TypeInfo {
                <Self as $crate::Typed>::type_info()
            }

            #[inline]
            fn is_zero(&self) -> bool {
                *self == <Self as ::core::default::Default>::default()
            }

            #[inline]
            fn to_value(
                &self,
                _cx: &$crate::Context<'_>,
            ) -> ::core::result::Result<$crate::Value, $crate::CodecError> {
                ::core::result::Result::Ok($crate::Value::any(::core::clone::Clone::clone(self)))
            }

            fn apply_value(
                &mut self,
                value: $crate::Value,
                _cx: &$crate::Context<'_>,
            ) -> ::core::result::Result<(), $crate::CodecError> {
                if value.is_nil() {
                    *self = <Self as ::core::default::Default>::default();
                    return ::core::result::Result::Ok(());
                }
                match value.downcast_ref::<Self>() {
                    ::core::option::Option::Some(payload) => {
                        *self = ::core::clone::Clone::clone(payload);
                        ::core::result::Result::Ok(())
                    }
                    ::core::option::Option::None => ::core::result::Result::Err(
                        $crate::impls::conversion_error(&value, <Self as $crate::Typed>::type_info()),
                    ),
                }
            }

            #[inline]
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Native>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn $crate::Native>> {
                $crate::impls::set_boxed(self, value)
            }
        }
    )+};
}

crate::impl_native_opaque!(core::time::Duration);

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::{AnyValue, Opaque};
    use crate::info::NativeKind;
    use crate::{CodecError, Native, Registry, Typed, Value, convert};

    #[test]
    fn any_value_passes_through() {
        let registry = Registry::new();

        let empty = AnyValue::empty();
        assert!(empty.is_zero());
        assert_eq!(convert::to_value(&empty, "ns", &registry).unwrap(), Value::Nil);

        let seq = Value::Seq(vec![Value::U8(1), Value::from("two")]);
        let any: AnyValue = convert::from_value(seq.clone(), "ns", &registry).unwrap();
        assert_eq!(convert::to_value(&any, "ns", &registry).unwrap(), seq);

        let payload = Value::any(3u32);
        let any: AnyValue = convert::from_value(payload.clone(), "ns", &registry).unwrap();
        assert_eq!(any.downcast_ref::<u32>(), Some(&3));
        assert_eq!(convert::to_value(&any, "ns", &registry).unwrap(), payload);
    }

    #[test]
    fn opaque_round_trip() {
        let registry = Registry::new();
        let native = Opaque(vec![1u8, 2]);
        let value = convert::to_value(&native, "ns", &registry).unwrap();
        assert_eq!(value.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2]));

        let back: Opaque<Vec<u8>> = convert::from_value(value, "ns", &registry).unwrap();
        assert_eq!(back, native);

        let err = convert::from_value::<Opaque<Vec<u8>>>(Value::U8(1), "ns", &registry).unwrap_err();
        assert!(matches!(err, CodecError::Conversion { from: "u8", .. }));
    }

    #[test]
    fn duration_is_opaque() {
        let registry = Registry::new();
        assert_eq!(Duration::type_info().kind(), NativeKind::Opaque);
        assert!(Duration::ZERO.is_zero());

        let value = convert::to_value(&Duration::from_secs(3), "ns", &registry).unwrap();
        let back: Duration = convert::from_value(value, "ns", &registry).unwrap();
        assert_eq!(back, Duration::from_secs(3));
    }
}
