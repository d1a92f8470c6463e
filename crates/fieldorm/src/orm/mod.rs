//! Record bindings: a validated `(record, partial, table, engine)` tuple.
//!
//! ```ignore
//! #[derive(Record)]
//! struct User { id: i64, name: String, create_time: DateTime<Utc>, update_time: DateTime<Utc> }
//!
//! #[derive(Partial, Default)]
//! struct UserOptional {
//!     id: Option<i64>,
//!     name: Option<String>,
//!     create_time: Option<DateTime<Utc>>,
//!     update_time: Option<DateTime<Utc>>,
//! }
//!
//! let users: Orm<User, UserOptional, _> = Orm::new(&user_table, engine)?;
//! let id = users.insert(&user).await?;
//! users
//!     .update_by_id(id, &UserOptional { name: Some("bob".into()), ..Default::default() })
//!     .await?;
//! let bob = users.get_by_id(id).await?;
//! ```

mod read;
mod write;

pub use read::{OrmCount, OrmSelect};
pub use write::OrmUpdate;

use crate::engine::Engine;
use crate::error::{OrmError, OrmResult};
use crate::field::{Field, Int64Field};
use crate::qb::{BuiltQuery, Expr};
use crate::record::{Partial, Record};
use crate::table::Table;
use crate::validate::validate_binding;
use crate::value::Value;
use std::marker::PhantomData;

pub(crate) const SQL_TARGET: &str = "fieldorm.sql";
const ID: &str = "id";

/// A record type `T`, its partial twin `P` and a table, bound to an engine.
///
/// The binding is validated once by [`Orm::new`]; afterwards it is read-only
/// and can be shared freely.
pub struct Orm<T, P, E> {
    table: Table,
    engine: E,
    _marker: PhantomData<fn() -> (T, P)>,
}

impl<T, P, E> std::fmt::Debug for Orm<T, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orm")
            .field("table", &self.table.name())
            .field("record", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: Record, P: Partial, E: Engine> Orm<T, P, E> {
    /// Validate the binding and take a snapshot of `table`.
    pub fn new(table: &Table, engine: E) -> OrmResult<Self> {
        if let Err(e) = validate_binding(table, T::FIELDS, P::FIELDS) {
            tracing::warn!(
                target: SQL_TARGET,
                table = %table.name(),
                record = std::any::type_name::<T>(),
                error = %e,
                "rejected record binding"
            );
            return Err(e.into());
        }
        Ok(Self {
            table: table.clone(),
            engine,
            _marker: PhantomData,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Every `Some` field of `cond` as `` `column` = ? ``.
    pub fn to_conditions(&self, cond: &P) -> Vec<Expr> {
        example_pairs(cond)
            .into_iter()
            .map(|(column, value)| {
                Expr::compare(Expr::Column(Field::bare(column)), "=", Expr::Value(value))
            })
            .collect()
    }

    /// Run hand-written SQL and map the rows to records.
    pub async fn query_sql(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<T>> {
        tracing::debug!(target: SQL_TARGET, op = "query", sql, args = args.len());
        let rows = self.engine.query(sql, args).await?;
        rows.iter().map(T::from_row).collect()
    }

    fn id_condition(&self, id: i64) -> OrmResult<Expr> {
        if id == 0 {
            return Err(OrmError::invalid_argument("requires id, got 0"));
        }
        if !self.table.has_field(ID) {
            return Err(OrmError::MissingIdField);
        }
        Ok(Int64Field::new("", ID).eq(id))
    }

    fn log_statement(&self, op: &'static str, built: &BuiltQuery) {
        tracing::debug!(
            target: SQL_TARGET,
            op,
            table = %self.table.name(),
            sql = %built.sql,
            args = built.params.len(),
        );
    }
}

/// `(column, value)` for every `Some` field, in declaration order.
fn example_pairs<P: Partial>(cond: &P) -> Vec<(&'static str, Value)> {
    P::FIELDS
        .iter()
        .zip(cond.values())
        .filter_map(|(desc, value)| value.map(|v| (desc.column, v)))
        .collect()
}

fn describe_pairs(pairs: &[(&str, Value)]) -> String {
    pairs
        .iter()
        .map(|(column, value)| format!("{column}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
