//! Paths into `tc_codec` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `tc_codec` crate.
///
/// 1. For crates that depend on `tc_codec`, `::tc_codec` is returned.
/// 2. For crates that depend on `tc_core`, `::tc_core::codec` is returned.
/// 3. For other situations, `::tc_codec` is returned, but this may be incorrect.
///
/// Reads the caller's manifest, call it once per derive.
pub(crate) fn tc_codec() -> syn::Path {
    tc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("tc_codec"))
}

#[inline(always)]
pub(crate) fn macro_exports_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::__macro_exports
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::__macro_exports::auto_register
    }
}

#[inline(always)]
pub(crate) fn native_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::Native
    }
}

#[inline(always)]
pub(crate) fn typed_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::Typed
    }
}

#[inline(always)]
pub(crate) fn type_info_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::info::TypeInfo
    }
}

#[inline(always)]
pub(crate) fn value_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::Value
    }
}

#[inline(always)]
pub(crate) fn context_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::Context
    }
}

#[inline(always)]
pub(crate) fn codec_error_(tc_codec_path: &syn::Path) -> TokenStream {
    quote! {
        #tc_codec_path::CodecError
    }
}

/// The cell holding the `TypeInfo` of the derived type.
///
/// ```ignore
/// static CELL: _Cell_ = _Cell_::new();
/// CELL.get_or_init(|| { ... })
/// ```
pub(crate) fn type_info_cell(
    tc_codec_path: &syn::Path,
    generic: bool,
    type_info_tokens: TokenStream,
) -> TokenStream {
    if generic {
        quote! {
            static CELL: #tc_codec_path::info::GenericTypeInfoCell =
                #tc_codec_path::info::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| {
                #type_info_tokens
            })
        }
    } else {
        quote! {
            static CELL: #tc_codec_path::info::NonGenericTypeInfoCell =
                #tc_codec_path::info::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                #type_info_tokens
            })
        }
    }
}
