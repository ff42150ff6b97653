#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::tc_codec`, which has to resolve inside this
// crate's own tests and doc tests as well.
extern crate self as tc_codec;

// -----------------------------------------------------------------------------
// Modules

mod native;

pub mod annotation;
pub mod convert;
pub mod descriptor;
pub mod hash;
pub mod impls;
pub mod info;
pub mod registry;
pub mod transcoder;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use convert::{CodecError, Context};
pub use native::{Native, Typed};
pub use registry::Registry;
pub use transcoder::Transcoder;
pub use value::{Value, ValueMap};

pub use tc_codec_derive as derive;

pub use num_complex;
