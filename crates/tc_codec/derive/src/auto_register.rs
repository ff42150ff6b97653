use proc_macro2::TokenStream;
use syn::{Generics, Ident};

use crate::attributes::TypeAttributes;

/// Generate the `auto_register` submission.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(
    tc_codec_path: &syn::Path,
    attrs: &TypeAttributes,
    ident: &Ident,
    generics: &Generics,
) -> TokenStream {
    let Some(span) = attrs.auto_register else {
        return TokenStream::new();
    };
    // Invalid for generic types.
    if !generics.params.is_empty() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(tc_codec_path);
    let typed_ = crate::path::typed_(tc_codec_path);

    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegister(<#ident as #typed_>::type_info)
        }
    }
}

/// Generate the `auto_register` submission.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(
    _: &syn::Path,
    _: &TypeAttributes,
    _: &Ident,
    _: &Generics,
) -> TokenStream {
    TokenStream::new()
}
