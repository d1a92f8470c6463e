//! Partial derive macro implementation
//!
//! `Option<T>` fields are described by their inner type with
//! `nullable: true`. Other fields are still described (as non-nullable) so
//! that binding validation can reject them with a precise error instead of a
//! type error deep inside generated code.

use crate::common::attrs::field_attr;
use crate::common::{field_desc, named_fields, split_option};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "Partial")?;

    let mut descs = Vec::new();
    let mut values = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = field_attr(field)?;
        if attr.column.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "Partial columns are derived from field names; `column` is only supported by FromRow",
            ));
        }
        if attr.skip {
            continue;
        }

        let field_name = ident.unraw().to_string();
        let column = field_name.to_snake_case();

        let (desc_ty, nullable) = split_option(&field.ty);
        descs.push(field_desc(&field_name, &column, desc_ty, nullable));
        values.push(if nullable {
            quote! { self.#ident.as_ref().map(fieldorm::ColumnValue::to_value) }
        } else {
            quote! { ::core::option::Option::Some(fieldorm::ColumnValue::to_value(&self.#ident)) }
        });
    }

    Ok(quote! {
        impl #impl_generics fieldorm::Partial for #name #ty_generics #where_clause {
            const FIELDS: &'static [fieldorm::FieldDesc] = &[#(#descs),*];

            fn values(&self) -> ::std::vec::Vec<::core::option::Option<fieldorm::Value>> {
                ::std::vec![#(#values),*]
            }
        }
    })
}
