//! Items used by the code `#[derive(Native)]` generates. Not public API.
#![doc(hidden)]

use crate::convert::{self, CodecError, Context};
use crate::value::Value;
use crate::Native;

pub use crate::impls::set_boxed;

/// Encode a record through the descriptor of its type.
#[inline]
pub fn encode_record(record: &dyn Native, cx: &Context<'_>) -> Result<Value, CodecError> {
    convert::encode_record(record, cx)
}

/// Decode a map into a record reset to its zero value.
#[inline]
pub fn decode_record(record: &mut dyn Native, value: Value, cx: &Context<'_>) -> Result<(), CodecError> {
    convert::decode_record(record, value, cx)
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::TypeInfo;

    /// A type submitted with `#[codec(auto_register)]`.
    pub struct AutoRegister(pub fn() -> &'static TypeInfo);

    inventory::collect!(AutoRegister);
}
