use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::{DeriveInput, Fields, Generics, parse_quote};

use crate::attributes::{FieldAttributes, TypeAttributes};

/// Clone `generics`, bounding every type parameter by `Typed`.
pub(crate) fn with_typed_bounds(generics: &Generics, typed_: &TokenStream) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    if params.is_empty() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause.predicates.push(parse_quote!(#ident: #typed_));
    }
    generics
}

/// Generate `Typed` and `Native` for a struct with named fields or a unit struct.
pub(crate) fn impl_record(ast: &DeriveInput, fields: &Fields) -> syn::Result<TokenStream> {
    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

    let tc_codec_path = crate::path::tc_codec();
    let macro_exports_ = crate::path::macro_exports_(&tc_codec_path);
    let native_ = crate::path::native_(&tc_codec_path);
    let typed_ = crate::path::typed_(&tc_codec_path);
    let type_info_ = crate::path::type_info_(&tc_codec_path);
    let value_ = crate::path::value_(&tc_codec_path);
    let context_ = crate::path::context_(&tc_codec_path);
    let codec_error_ = crate::path::codec_error_(&tc_codec_path);

    let mut field_infos = Vec::with_capacity(fields.len());
    let mut zero_inits = Vec::with_capacity(fields.len());
    let mut is_zero_terms = Vec::with_capacity(fields.len());
    let mut field_arms = Vec::with_capacity(fields.len());
    let mut field_mut_arms = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let name = ident.unraw().to_string();
        let ty = &field.ty;

        let annotations = attrs
            .annotations
            .iter()
            .map(|(namespace, annotation)| quote! { (#namespace, #annotation) });
        let flattened = attrs
            .flatten
            .map(|span| quote_spanned! { span => .flattened() });

        field_infos.push(quote! {
            #tc_codec_path::info::FieldInfo::new::<#ty>(#name, #index)
                .with_annotations(&[#(#annotations),*])
                #flattened
        });
        zero_inits.push(quote! { #ident: <#ty as #typed_>::zero() });
        is_zero_terms.push(quote! { <#ty as #native_>::is_zero(&self.#ident) });
        field_arms.push(quote! {
            #index => ::core::option::Option::Some(&self.#ident as &dyn #native_)
        });
        field_mut_arms.push(quote! {
            #index => ::core::option::Option::Some(&mut self.#ident as &mut dyn #native_)
        });
    }

    let zero = match fields {
        Fields::Named(_) => quote! { Self { #(#zero_inits),* } },
        _ => quote! { Self },
    };

    // Unit structs keep the default `None` accessors.
    let field_methods = if field_arms.is_empty() {
        TokenStream::new()
    } else {
        quote! {
            fn field(&self, index: usize) -> ::core::option::Option<&dyn #native_> {
                match index {
                    #(#field_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #native_> {
                match index {
                    #(#field_mut_arms,)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    let type_info_tokens = quote! {
        #type_info_::record::<Self>(
            #tc_codec_path::info::RecordInfo::new(&[#(#field_infos),*])
        )
    };
    let cell = crate::path::type_info_cell(
        &tc_codec_path,
        !ast.generics.params.is_empty(),
        type_info_tokens,
    );

    let ident = &ast.ident;
    let generics = with_typed_bounds(&ast.generics, &typed_);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let auto_register =
        crate::auto_register::get_auto_register_impl(&tc_codec_path, &type_attrs, ident, &ast.generics);

    Ok(quote! {
        const _: () = {
            impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
                fn type_info() -> &'static #type_info_ {
                    #cell
                }

                #[inline]
                fn zero() -> Self {
                    #zero
                }
            }

            impl #impl_generics #native_ for #ident #ty_generics #where_clause {
                #[inline]
                fn native_type_info(&self) -> &'static #type_info_ {
                    <Self as #typed_>::type_info()
                }

                fn is_zero(&self) -> bool {
                    true #(&& #is_zero_terms)*
                }

                #[inline]
                fn to_value(
                    &self,
                    cx: &#context_<'_>,
                ) -> ::core::result::Result<#value_, #codec_error_> {
                    #macro_exports_::encode_record(self, cx)
                }

                fn apply_value(
                    &mut self,
                    value: #value_,
                    cx: &#context_<'_>,
                ) -> ::core::result::Result<(), #codec_error_> {
                    *self = <Self as #typed_>::zero();
                    #macro_exports_::decode_record(self, value, cx)
                }

                #[inline]
                fn set(
                    &mut self,
                    value: ::std::boxed::Box<dyn #native_>,
                ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #native_>> {
                    #macro_exports_::set_boxed(self, value)
                }

                #field_methods
            }

            #auto_register
        };
    })
}
