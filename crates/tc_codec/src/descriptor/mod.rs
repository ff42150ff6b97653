//! Descriptors of the encodable fields of a record type.
//!
//! - [`FieldDescriptor`]: one encodable field, with its parsed annotation.
//! - [`RecordDescriptor`]: every encodable field of one record type for one
//!   namespace, keyed by nickname and in field order.
//!
//! Building a descriptor walks the record's [`TypeInfo`](crate::info::TypeInfo),
//! use [`Registry`](crate::Registry) to build each one once.

// -----------------------------------------------------------------------------
// Modules

mod field;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use field::FieldDescriptor;
pub use record::RecordDescriptor;
