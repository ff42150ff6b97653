use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, FieldsUnnamed};

use crate::attributes::{TypeAttributes, reject_field_attributes};
use crate::record::with_typed_bounds;

/// Generate `Typed` and `Native` for a single-field tuple struct.
///
/// Every method forwards to the wrapped value.
pub(crate) fn impl_alias(ast: &DeriveInput, fields: &FieldsUnnamed) -> syn::Result<TokenStream> {
    let type_attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
    let field = &fields.unnamed[0];
    reject_field_attributes(&field.attrs, "the field of a newtype alias")?;
    let ty = &field.ty;

    let tc_codec_path = crate::path::tc_codec();
    let macro_exports_ = crate::path::macro_exports_(&tc_codec_path);
    let native_ = crate::path::native_(&tc_codec_path);
    let typed_ = crate::path::typed_(&tc_codec_path);
    let type_info_ = crate::path::type_info_(&tc_codec_path);
    let value_ = crate::path::value_(&tc_codec_path);
    let context_ = crate::path::context_(&tc_codec_path);
    let codec_error_ = crate::path::codec_error_(&tc_codec_path);

    let cell = crate::path::type_info_cell(
        &tc_codec_path,
        !ast.generics.params.is_empty(),
        quote! { #type_info_::alias::<Self, #ty>() },
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
                    Self(<#ty as #typed_>::zero())
                }

                #[inline]
                fn make_empty() -> Self {
                    Self(<#ty as #typed_>::make_empty())
                }
            }

            impl #impl_generics #native_ for #ident #ty_generics #where_clause {
                #[inline]
                fn native_type_info(&self) -> &'static #type_info_ {
                    <Self as #typed_>::type_info()
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    <#ty as #native_>::is_zero(&self.0)
                }

                #[inline]
                fn to_value(
                    &self,
                    cx: &#context_<'_>,
                ) -> ::core::result::Result<#value_, #codec_error_> {
                    <#ty as #native_>::to_value(&self.0, cx)
                }

                #[inline]
                fn apply_value(
                    &mut self,
                    value: #value_,
                    cx: &#context_<'_>,
                ) -> ::core::result::Result<(), #codec_error_> {
                    <#ty as #native_>::apply_value(&mut self.0, value, cx)
                }

                #[inline]
                fn set(
                    &mut self,
                    value: ::std::boxed::Box<dyn #native_>,
                ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #native_>> {
                    #macro_exports_::set_boxed(self, value)
                }

                #[inline]
                fn field(&self, index: usize) -> ::core::option::Option<&dyn #native_> {
                    <#ty as #native_>::field(&self.0, index)
                }

                #[inline]
                fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #native_> {
                    <#ty as #native_>::field_mut(&mut self.0, index)
                }

                #[inline]
                fn referent(&self) -> ::core::option::Option<&dyn #native_> {
                    <#ty as #native_>::referent(&self.0)
                }

                #[inline]
                fn referent_mut(&mut self) -> ::core::option::Option<&mut dyn #native_> {
                    <#ty as #native_>::referent_mut(&mut self.0)
                }
            }

            #auto_register
        };
    })
}
