use std::collections::VecDeque;

use crate::convert::{CodecError, Context};
use crate::impls::{conversion_error, set_boxed};
use crate::info::{GenericTypeInfoCell, TypeInfo};
use crate::value::Value;
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Helpers

fn items_to_value<'a, T: Native>(
    items: impl ExactSizeIterator<Item = &'a T>,
    cx: &Context<'_>,
) -> Result<Value, CodecError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(item.to_value(cx)?);
    }
    Ok(Value::Seq(out))
}

/// Decode a `Seq` item by item, `Nil` yields no items.
fn items_from_value<T: Typed>(
    value: Value,
    cx: &Context<'_>,
    info: &'static TypeInfo,
) -> Result<Vec<T>, CodecError> {
    let items = match value {
        Value::Seq(items) => items,
        Value::Nil => return Ok(Vec::new()),
        other => return Err(conversion_error(&other, info)),
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let mut native = T::zero();
        native.apply_value(item, cx)?;
        out.push(native);
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Vec & VecDeque

macro_rules! impl_sequence {
    ($($ty:ident),*) => {$(
        impl<T: Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(TypeInfo::sequence::<Self, T>)
            }

            #[inline]
            fn zero() -> Self {
                $ty::new()
            }
        }

        impl<T: Typed> Native for $ty<T> {
            #[inline]
            fn native_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            #[inline]
            fn is_zero(&self) -> bool {
                self.is_empty()
            }

            fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
                items_to_value(self.iter(), cx)
            }

            fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
                *self = items_from_value::<T>(value, cx, Self::type_info())?.into();
                Ok(())
            }

            #[inline]
            fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
                set_boxed(self, value)
            }
        }
    )*};
}

impl_sequence!(Vec, VecDeque);

// -----------------------------------------------------------------------------
// Array

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::array::<Self, T>(N))
    }

    fn zero() -> Self {
        core::array::from_fn(|_| T::zero())
    }
}

impl<T: Typed, const N: usize> Native for [T; N] {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    fn is_zero(&self) -> bool {
        self.iter().all(Native::is_zero)
    }

    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
        items_to_value(self.iter(), cx)
    }

    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
        if value.is_nil() {
            *self = Self::zero();
            return Ok(());
        }
        let items = items_from_value::<T>(value, cx, Self::type_info())?;
        *self = items.try_into().map_err(|items: Vec<T>| CodecError::LengthMismatch {
            expected: N,
            found: items.len(),
        })?;
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }
}
