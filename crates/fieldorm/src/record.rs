//! Compile-time descriptions of record structs.
//!
//! `#[derive(Record)]` and `#[derive(Partial)]` emit a static [`FieldDesc`]
//! list per struct. The binding layer validates those lists against a
//! [`Table`](crate::Table) once and afterwards reads and writes values
//! through them, in the same order.

use crate::row::FromRow;
use crate::value::{Value, ValueKind};
use std::any::TypeId;

/// One mapped struct field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    /// Rust field name.
    pub name: &'static str,
    /// Column name: the snake_case form of `name`.
    pub column: &'static str,
    pub kind: ValueKind,
    /// The field is an `Option<_>`; `kind` and `type_id` describe the inner type.
    pub nullable: bool,
    pub type_id: fn() -> TypeId,
    pub type_name: fn() -> &'static str,
}

impl FieldDesc {
    pub fn is_count(&self) -> bool {
        self.column == "count"
    }
}

/// A struct mapped onto a table row.
///
/// ```ignore
/// #[derive(Record)]
/// struct User {
///     id: i64,
///     name: String,
///     create_time: DateTime<Utc>,
///     update_time: DateTime<Utc>,
///     count: i64, // only populated by count queries
/// }
/// ```
pub trait Record: FromRow + Send + Sync + 'static {
    const FIELDS: &'static [FieldDesc];

    /// Field values, aligned with [`Record::FIELDS`].
    fn values(&self) -> Vec<Value>;
}

/// The partial-update twin of a [`Record`]: every field is an `Option`, and
/// `None` means "leave alone" (for updates) or "don't filter" (for
/// by-example lookups).
pub trait Partial: Send + Sync + 'static {
    const FIELDS: &'static [FieldDesc];

    /// Field values, aligned with [`Partial::FIELDS`].
    fn values(&self) -> Vec<Option<Value>>;
}
