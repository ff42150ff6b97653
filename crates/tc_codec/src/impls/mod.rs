//! [`Native`] implementations for foreign types, and helpers to write more.
//!
//! ## Implemented Menu
//!
//! - scalars:
//!     - `bool`, `char`
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `num_complex::Complex32`, `num_complex::Complex64`
//!     - `String`, `Cow<'static, str>`
//! - sequences: `Vec<T>`, `VecDeque<T>`, `[T; N]`
//! - maps: `std::collections::HashMap<K, V>`, `BTreeMap<K, V>`, `hashbrown::HashMap<K, V>`
//! - references: `Option<T>`, `Box<T>`, `Arc<T>`
//! - polymorphic: [`AnyValue`]
//! - opaque: [`Opaque<T>`], `core::time::Duration`, and any type declared
//!   with [`impl_native_opaque!`](crate::impl_native_opaque)
//!
//! Records and newtype aliases are implemented by
//! [`#[derive(Native)]`](crate::derive::Native).

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod map;
mod reference;
mod scalar;
mod seq;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{AnyValue, Opaque};

use crate::convert::CodecError;
use crate::info::TypeInfo;
use crate::value::Value;
use crate::Native;

/// The standard implementation of [`Native::set`].
#[inline]
pub fn set_boxed<T: Native>(this: &mut T, value: Box<dyn Native>) -> Result<(), Box<dyn Native>> {
    *this = value.take::<T>()?;
    Ok(())
}

/// A [`CodecError::Conversion`] from `value` to the type described by `to`.
#[inline]
pub fn conversion_error(value: &Value, to: &TypeInfo) -> CodecError {
    CodecError::Conversion {
        from: value.type_name(),
        to: to.type_path(),
    }
}
