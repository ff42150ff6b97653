use core::any::{Any, TypeId};
use core::fmt;

use crate::convert::{CodecError, Context};
use crate::info::{NativeKind, TypeInfo};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Native

/// A value the transcoder can convert to and from [`Value`].
///
/// It's strongly recommended to use [`#[derive(Native)]`](crate::derive::Native)
/// for records and newtype aliases. Implementations for primitives, strings,
/// containers and references are provided in [`impls`](crate::impls).
///
/// # Type Identification
///
/// [`Any::type_id`] on a `Box<dyn Native>` returns the id of the box, use
/// [`native_type_info`](Native::native_type_info) or [`is`](trait.Native.html#method.is):
///
/// ```
/// # use tc_codec::Native;
/// # use core::any::TypeId;
/// let x: Box<dyn Native> = Box::new(32_i32);
///
/// assert!(x.is::<i32>());
/// assert!(x.native_type_info().is::<i32>());
/// assert_eq!(x.downcast_ref::<i32>(), Some(&32));
/// ```
///
/// # Implementation Guide
///
/// `set` has a standard implementation:
///
/// ```ignore
/// fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
///     *self = value.take::<Self>()?;
///     Ok(())
/// }
/// ```
///
/// Records expose their declared fields through [`field`](Native::field) and
/// [`field_mut`](Native::field_mut), references expose the pointed-to value
/// through [`referent`](Native::referent) and [`referent_mut`](Native::referent_mut).
pub trait Native: Any + Send + Sync {
    /// Returns the [`TypeInfo`] of the underlying type.
    fn native_type_info(&self) -> &'static TypeInfo;

    /// Whether this is the zero value of its type.
    fn is_zero(&self) -> bool;

    /// Encode into the generic representation.
    fn to_value(&self, cx: &Context<'_>) -> Result<Value, CodecError>;

    /// Decode `value` into `self`, overwriting its content.
    fn apply_value(&mut self, value: Value, cx: &Context<'_>) -> Result<(), CodecError>;

    /// Replace `self` with `value` if both have the same type.
    ///
    /// Returns `value` unchanged otherwise.
    fn set(&mut self, value: Box<dyn Native>) -> Result<(), Box<dyn Native>>;

    /// The `index`-th declared field of a record.
    fn field(&self, index: usize) -> Option<&dyn Native> {
        let _ = index;
        None
    }

    /// The `index`-th declared field of a record.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Native> {
        let _ = index;
        None
    }

    /// The pointed-to value of a reference, `None` for null references.
    fn referent(&self) -> Option<&dyn Native> {
        None
    }

    /// The pointed-to value of a reference, `None` for null references.
    fn referent_mut(&mut self) -> Option<&mut dyn Native> {
        None
    }
}

impl dyn Native {
    /// Shorthand for `self.native_type_info().kind()`.
    #[inline]
    pub fn kind(&self) -> NativeKind {
        self.native_type_info().kind()
    }

    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::type_id(self) == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Native>) -> Result<Box<T>, Box<dyn Native>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            Ok(any.downcast::<T>().unwrap_or_else(|_| unreachable!()))
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Native>) -> Result<T, Box<dyn Native>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Native<{}>", self.native_type_info().type_path())
    }
}

// -----------------------------------------------------------------------------
// Typed

/// Static access to a native type's [`TypeInfo`] and constructors.
///
/// # Examples
///
/// ```
/// use tc_codec::{Typed, info::NativeKind};
///
/// assert_eq!(u8::type_info().kind(), NativeKind::U8);
/// assert_eq!(<Option<u8>>::zero(), None);
/// assert_eq!(<Option<u8>>::make_empty(), Some(0));
/// ```
pub trait Typed: Native + Sized {
    /// A static accessor to the type information.
    fn type_info() -> &'static TypeInfo;

    /// The zero value: `0`, `false`, empty text and containers, `None`, and
    /// records whose fields are all zero.
    fn zero() -> Self;

    /// A new instance ready to be decoded into.
    ///
    /// Equal to [`zero`](Typed::zero) except for references, whose empty
    /// instance points to an empty referent.
    fn make_empty() -> Self {
        Self::zero()
    }
}
