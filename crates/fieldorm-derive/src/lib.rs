//! Derive macros for fieldorm
//!
//! Provides `#[derive(Record)]`, `#[derive(Partial)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod common;
mod from_row;
mod partial;
mod record;

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use fieldorm::FromRow;
///
/// #[derive(FromRow)]
/// struct UserPosts {
///     user_id: i64,
///     #[orm(column = "post_count")]
///     posts: i64,
///     nickname: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field at its `Default`
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Record` (and `FromRow`) for a struct bound to a table.
///
/// Each field maps to the column named by its snake_case form. A `count: i64`
/// field is reserved for aggregate results.
///
/// # Example
///
/// ```ignore
/// use fieldorm::Record;
///
/// #[derive(Record, Default)]
/// struct User {
///     id: i64,
///     name: String,
///     create_time: DateTime<Utc>,
///     update_time: DateTime<Utc>,
///     count: i64,
///     #[orm(skip)]
///     cached_label: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Partial` for the all-`Option` twin of a `Record`.
///
/// # Example
///
/// ```ignore
/// use fieldorm::Partial;
///
/// #[derive(Partial, Default)]
/// struct UserOptional {
///     id: Option<i64>,
///     name: Option<String>,
///     create_time: Option<DateTime<Utc>>,
///     update_time: Option<DateTime<Utc>>,
/// }
/// ```
#[proc_macro_derive(Partial, attributes(orm))]
pub fn derive_partial(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    partial::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
