//! Field walking and `FieldDesc` emission shared by the derives.

pub mod attrs;

use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, GenericArgument, PathArguments, Result, Token, Type};

/// The named fields of a struct, or an error naming the derive.
pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a Punctuated<syn::Field, Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

/// A `fieldorm::FieldDesc` literal for a field of type `ty`.
pub fn field_desc(name: &str, column: &str, ty: &Type, nullable: bool) -> TokenStream {
    quote! {
        fieldorm::FieldDesc {
            name: #name,
            column: #column,
            kind: <#ty as fieldorm::ColumnValue>::KIND,
            nullable: #nullable,
            type_id: ::std::any::TypeId::of::<#ty>,
            type_name: ::std::any::type_name::<#ty>,
        }
    }
}

/// The column type of a field and whether the column may be NULL.
///
/// `Option<T>` (under any path ending in `Option`) is nullable with column
/// type `T`. Everything else is its own column type.
pub fn split_option(ty: &Type) -> (&Type, bool) {
    match option_arg(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    }
}

fn option_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last().filter(|seg| seg.ident == "Option")?;
    match &last.arguments {
        PathArguments::AngleBracketed(generic) if generic.args.len() == 1 => {
            match generic.args.first() {
                Some(GenericArgument::Type(inner)) => Some(inner),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::parse_quote;

    fn column_type(ty: Type) -> (String, bool) {
        let (inner, nullable) = split_option(&ty);
        (inner.to_token_stream().to_string(), nullable)
    }

    #[test]
    fn nullable_columns_unwrap_option() {
        assert_eq!(column_type(parse_quote!(Option<String>)), ("String".into(), true));
        assert_eq!(
            column_type(parse_quote!(core::option::Option<i64>)),
            ("i64".into(), true)
        );
    }

    #[test]
    fn plain_columns_keep_their_type() {
        assert_eq!(column_type(parse_quote!(i32)), ("i32".into(), false));
        assert_eq!(
            column_type(parse_quote!(Vec<u8>)),
            ("Vec < u8 >".into(), false)
        );
        // A bare `Option` without an argument is not a nullable wrapper.
        assert_eq!(column_type(parse_quote!(Option)), ("Option".into(), false));
    }
}
