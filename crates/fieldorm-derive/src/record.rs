//! Record derive macro implementation
//!
//! Emits `fieldorm::Record` (the field descriptor list plus value
//! extraction) and a lenient `fieldorm::FromRow`: columns absent from the
//! row decode to the field's default, so partial selects and count queries
//! still map onto the full record.

use crate::common::attrs::field_attr;
use crate::common::{field_desc, named_fields};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "Record")?;

    let mut descs = Vec::new();
    let mut values = Vec::new();
    let mut extracts = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = field_attr(field)?;
        if attr.column.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "Record columns are derived from field names; `column` is only supported by FromRow",
            ));
        }
        if attr.skip {
            extracts.push(quote! { #ident: ::core::default::Default::default() });
            continue;
        }

        let ty = &field.ty;
        let field_name = ident.unraw().to_string();
        let column = field_name.to_snake_case();

        descs.push(field_desc(&field_name, &column, ty, false));
        values.push(quote! { fieldorm::ColumnValue::to_value(&self.#ident) });
        extracts.push(quote! { #ident: row.get_or_default::<#ty>(#column)? });
    }

    Ok(quote! {
        impl #impl_generics fieldorm::Record for #name #ty_generics #where_clause {
            const FIELDS: &'static [fieldorm::FieldDesc] = &[#(#descs),*];

            fn values(&self) -> ::std::vec::Vec<fieldorm::Value> {
                ::std::vec![#(#values),*]
            }
        }

        impl #impl_generics fieldorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &fieldorm::Row) -> fieldorm::OrmResult<Self> {
                Ok(Self {
                    #(#extracts),*
                })
            }
        }
    })
}
