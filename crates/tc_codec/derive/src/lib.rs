//! See [`Native`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

static CODEC_ATTRIBUTE_NAME: &str = "codec";

// -----------------------------------------------------------------------------
// Modules

mod alias;
mod attributes;
mod auto_register;
mod path;
mod record;

// -----------------------------------------------------------------------------
// Macros

/// # Native Derivation
///
/// `#[derive(Native)]` implements `Typed` and `Native` for:
///
/// - structs with named fields, and unit structs, as **records**;
/// - single-field tuple structs (`struct Age(u64);`) as **aliases** of the
///   wrapped type. An alias converts exactly like the type it wraps.
///
/// Every field type must implement `Typed`. Type parameters are bounded by
/// `Typed` automatically. Enums and tuple structs with several fields are
/// rejected.
///
/// ## Field annotations
///
/// Each `namespace = "annotation"` pair attaches the annotation used when
/// transcoding under that namespace:
///
/// ```rust, ignore
/// #[derive(Native)]
/// struct User {
///     #[codec(json = "name", db = "user_name")]
///     name: String,
///     #[codec(json = "-")]
///     password: String,
///     #[codec(json = "address, @tag=geo")]
///     address: Address,
/// }
/// ```
///
/// A field without an annotation for a namespace is keyed by its declared name.
///
/// ## Flattening
///
/// `flatten` promotes the fields of a nested record, or of a reference to one,
/// into the outer record:
///
/// ```rust, ignore
/// #[derive(Native)]
/// struct Document {
///     id: u64,
///     #[codec(flatten)]
///     meta: Metadata,
/// }
/// ```
///
/// ## Auto Register
///
/// With the `auto_register` feature, `#[codec(auto_register)]` at the type
/// level submits the type to `Registry::auto_register`. It is ignored for
/// generic types.
///
/// ```rust, ignore
/// #[derive(Native)]
/// #[codec(auto_register)]
/// struct Account { /* ... */ }
/// ```
#[proc_macro_derive(Native, attributes(codec))]
pub fn derive_native(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let result = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(_) | Fields::Unit => record::impl_record(&ast, &data.fields),
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => alias::impl_alias(&ast, fields),
            Fields::Unnamed(fields) => Err(syn::Error::new_spanned(
                fields,
                "`Native` cannot be derived for tuple structs with more than one field",
            )),
        },
        Data::Enum(data) => Err(syn::Error::new_spanned(
            data.enum_token,
            "`Native` cannot be derived for enums",
        )),
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "`Native` cannot be derived for unions",
        )),
    };

    result.unwrap_or_else(syn::Error::into_compile_error).into()
}
