//! FromRow derive macro implementation

use crate::common::attrs::field_attr;
use crate::common::{named_fields, split_option};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "FromRow")?;

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attr = field_attr(field)?;
        if attr.skip {
            field_extracts.push(quote! {
                #field_name: ::core::default::Default::default()
            });
            continue;
        }
        let column_name = attr
            .column
            .unwrap_or_else(|| field_name.unraw().to_string());

        let extract = match split_option(&field.ty) {
            (inner, true) => quote! { row.try_get_opt::<#inner>(#column_name)? },
            (ty, false) => quote! { row.try_get::<#ty>(#column_name)? },
        };
        field_extracts.push(quote! { #field_name: #extract });
    }

    Ok(quote! {
        impl #impl_generics fieldorm::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &fieldorm::Row) -> fieldorm::OrmResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
