use std::sync::Arc;

use crate::convert::{CodecError, Context};
use crate::impls::set_boxed;
use crate::info::{GenericTypeInfoCell, TypeInfo};
use crate::value::Value;
use crate::{Native, Typed};

// -----------------------------------------------------------------------------
// Option

/// A nullable reference: `None` encodes to `Nil` and `Nil` decodes to `None`.
impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::reference::<Self, T>)
    }

    #[inline]
    fn zero() -> Self {
        None
    }

    #[inline]
    fn make_empty() -> Self {
        Some(T::make_empty())
    }
}

impl<T: Typed> Native for Option<T> {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
        match self {
            Some(referent) => referent.to_value(cx),
            None => Ok(Value::Nil),
        }
    }

    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
        if value.is_nil() {
            *self = None;
            return Ok(());
        }
        let mut referent = T::zero();
        referent.apply_value(value, cx)?;
        *self = Some(referent);
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }

    #[inline]
    fn referent(&self) -> Option<&dyn Native> {
        self.as_ref().map(|referent| referent as &dyn Native)
    }

    #[inline]
    fn referent_mut(&mut self) -> Option<&mut dyn Native> {
        self.as_mut().map(|referent| referent as &mut dyn Native)
    }
}

// -----------------------------------------------------------------------------
// Box

/// A reference that is never null, and so never zero.
impl<T: Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::reference::<Self, T>)
    }

    #[inline]
    fn zero() -> Self {
        Box::new(T::zero())
    }

    #[inline]
    fn make_empty() -> Self {
        Box::new(T::make_empty())
    }
}

impl<T: Typed> Native for Box<T> {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        false
    }

    #[inline]
    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
        (**self).to_value(cx)
    }

    #[inline]
    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
        (**self).apply_value(value, cx)
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }

    #[inline]
    fn referent(&self) -> Option<&dyn Native> {
        Some(&**self)
    }

    #[inline]
    fn referent_mut(&mut self) -> Option<&mut dyn Native> {
        Some(&mut **self)
    }
}

// -----------------------------------------------------------------------------
// Arc

/// A shared reference, never zero. Decoding replaces the allocation, writing
/// through [`Native::referent_mut`] requires the `Arc` to be unique.
impl<T: Typed> Typed for Arc<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(TypeInfo::reference::<Self, T>)
    }

    #[inline]
    fn zero() -> Self {
        Arc::new(T::zero())
    }

    #[inline]
    fn make_empty() -> Self {
        Arc::new(T::make_empty())
    }
}

impl<T: Typed> Native for Arc<T> {
    #[inline]
    fn native_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn is_zero(&self) -> bool {
        false
    }

    #[inline]
    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError> {
        (**self).to_value(cx)
    }

    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
        let mut referent = T::zero();
        referent.apply_value(value, cx)?;
        *self = Arc::new(referent);
        Ok(())
    }

    #[inline]
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
        set_boxed(self, value)
    }

    #[inline]
    fn referent(&self) -> Option<&dyn Native> {
        Some(&**self)
    }

    fn referent_mut(&mut self) -> Option<&mut dyn Native> {
        Arc::get_mut(self).map(|referent| referent as &mut dyn Native)
    }
}
