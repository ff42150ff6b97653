//! Static type information, the capability the engine queries instead of
//! runtime reflection.
//!
//! ## Menu
//!
//! - [`Type`]: A `TypeId` with the type's path, used as the identity of a type.
//! - [`NativeKind`]: The kind of a native type, e.g. `U32`, `Sequence`, `Record`.
//! - [`TypeInfo`]: Per-type information, including kind, element/key/referent
//!   types and constructors for zero and empty instances.
//! - [`RecordInfo`]: The declared fields of a record type.
//! - [`FieldInfo`]: One declared field: name, index, type and raw annotations.
//! - [`NonGenericTypeInfoCell`] / [`GenericTypeInfoCell`]: Static storage used
//!   to implement [`Typed`](crate::Typed).
//!
//! `TypeInfo` for user types is generated by
//! [`#[derive(Native)]`](crate::derive::Native).

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod field_info;
mod kind;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use field_info::{FieldInfo, RecordInfo};
pub use kind::NativeKind;
pub use type_info::{Type, TypeInfo};
