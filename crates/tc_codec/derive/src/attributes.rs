//! Parsing of `#[codec(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Token};

use crate::CODEC_ATTRIBUTE_NAME;

const FLATTEN: &str = "flatten";
const AUTO_REGISTER: &str = "auto_register";

fn codec_attributes(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(CODEC_ATTRIBUTE_NAME))
}

/// Reject `key = value` for a flag that takes no value.
fn expect_flag(meta: &ParseNestedMeta, name: &str) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        return Err(meta.error(format_args!("`{name}` does not take a value")));
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Type Attributes

/// Format: `#[codec(auto_register)]`
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in codec_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(AUTO_REGISTER) {
                    expect_flag(&meta, AUTO_REGISTER)?;
                    this.auto_register = Some(meta.path.span());
                    Ok(())
                } else {
                    Err(meta.error("unknown type attribute, expected `auto_register`"))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field Attributes

/// Format: `#[codec(namespace = "annotation", ..., flatten)]`
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// `(namespace, annotation)` in declaration order, one per namespace.
    pub annotations: Vec<(String, LitStr)>,
    pub flatten: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in codec_attributes(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(FLATTEN) {
                    expect_flag(&meta, FLATTEN)?;
                    this.flatten = Some(meta.path.span());
                    return Ok(());
                }
                if meta.path.is_ident(AUTO_REGISTER) {
                    return Err(meta.error("`auto_register` is a type attribute"));
                }

                let Some(namespace) = meta.path.get_ident().map(ToString::to_string) else {
                    return Err(meta.error("expected `namespace = \"annotation\"`"));
                };
                let annotation: LitStr = meta.value()?.parse()?;

                if this.annotations.iter().any(|(ns, _)| *ns == namespace) {
                    return Err(meta.error(format_args!(
                        "duplicate annotation for namespace `{namespace}`"
                    )));
                }
                this.annotations.push((namespace, annotation));
                Ok(())
            })?;
        }
        Ok(this)
    }
}

/// Error on any `codec` attribute in `attrs`, attached to `what`.
pub(crate) fn reject_field_attributes(attrs: &[Attribute], what: &str) -> syn::Result<()> {
    match codec_attributes(attrs).next() {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            format_args!("`codec` field attributes are not supported on {what}"),
        )),
        None => Ok(()),
    }
}
