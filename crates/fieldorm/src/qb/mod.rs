//! Query builder (QB) system for fieldorm.
//!
//! Typed fields and the free functions in this module compose into [`Expr`]
//! trees; the statement builders render them into MySQL-flavoured SQL with
//! `?` placeholders and a matching, ordered argument list.
//!
//! # Usage
//!
//! ```ignore
//! use fieldorm::{exprs, qb};
//!
//! let built = qb::select(exprs![&user.id, &user.name, qb::count(&post.id).as_("posts")])
//!     .from(user.table.name())
//!     .left_join(post.table.name(), user.id.eq_field(&post.user_id))
//!     .and_where(qb::or([user.name.contains(keyword), user.email.contains(keyword)]))
//!     .group_by(&user.id)
//!     .order_by(user.id.desc())
//!     .limit(20)
//!     .build()?;
//!
//! qb::update(user.table.name())
//!     .set(&user.age, user.age.increment(1))
//!     .and_where(user.id.eq(7))
//!     .execute(&engine)
//!     .await?;
//! ```

mod delete;
mod expr;
pub mod func;
mod insert;
mod param;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use expr::Expr;
pub use func::{
    Aggregate, avg, coalesce, concat, count, count_all, date, func, ifnull, json_array,
    json_contains, json_extract, json_insert, json_keys, json_length, json_object, json_remove,
    json_replace, json_search, json_set, json_type, json_unquote, json_valid, length, lower, max,
    min, now, rand, sum, trim, upper,
};
pub use insert::InsertQb;
pub use param::ParamList;
pub use select::SelectQb;
pub use traits::{BuiltQuery, MutationQb, SqlQb};
pub use update::UpdateQb;

use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Collect heterogeneous expressions (fields, aggregates, literals) into a
/// `Vec<Expr>`.
///
/// ```ignore
/// qb::select(exprs![&user.id, qb::count(&post.id).as_("n")])
/// ```
#[macro_export]
macro_rules! exprs {
    () => {
        ::std::vec::Vec::<$crate::qb::Expr>::new()
    };
    ($($e:expr),+ $(,)?) => {
        ::std::vec![$($crate::qb::Expr::from($e)),+]
    };
}

/// Create a SELECT query builder; an empty list selects `*`.
pub fn select(fields: Vec<Expr>) -> SelectQb {
    SelectQb::new(fields)
}

pub fn insert_into(table: impl Into<String>) -> InsertQb {
    InsertQb::new(table)
}

pub fn update(table: impl Into<String>) -> UpdateQb {
    UpdateQb::new(table)
}

pub fn delete_from(table: impl Into<String>) -> DeleteQb {
    DeleteQb::new(table)
}

// ==================== Combinators ====================

/// `(a AND b ...)`; no-ops are dropped, a single survivor is returned as is.
pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::And(exprs.into_iter().collect())
}

/// `(a OR b ...)`; no-ops are dropped, a single survivor is returned as is.
pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Or(exprs.into_iter().collect())
}

/// `NOT (a AND b ...)`
pub fn not(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Not(exprs.into_iter().collect())
}

pub fn paren(expr: impl Into<Expr>) -> Expr {
    Expr::Paren(Box::new(expr.into()))
}

/// Include `exprs` only when `flag` is set.
///
/// ```ignore
/// .and_where(qb::optional(!name.is_empty(), [user.name.eq(name)]))
/// ```
pub fn optional(flag: bool, exprs: impl IntoIterator<Item = Expr>) -> Expr {
    if !flag {
        return Expr::Noop;
    }
    let mut exprs: Vec<Expr> = exprs.into_iter().collect();
    match exprs.len() {
        0 => Expr::Noop,
        1 => exprs.remove(0),
        _ => Expr::And(exprs),
    }
}

pub fn add(operands: Vec<Expr>) -> Expr {
    Expr::Math { op: "+", operands }
}

pub fn sub(operands: Vec<Expr>) -> Expr {
    Expr::Math { op: "-", operands }
}

pub fn mul(operands: Vec<Expr>) -> Expr {
    Expr::Math { op: "*", operands }
}

pub fn div(operands: Vec<Expr>) -> Expr {
    Expr::Math { op: "/", operands }
}

/// `*`
pub fn all() -> Expr {
    Expr::raw("*", Vec::<Value>::new())
}

// ==================== Literals ====================

pub fn string(v: impl Into<String>) -> Expr {
    Expr::Value(Value::String(v.into()))
}

pub fn int32(v: i32) -> Expr {
    Expr::Value(Value::Int32(v))
}

pub fn int64(v: i64) -> Expr {
    Expr::Value(Value::Int64(v))
}

pub fn float64(v: f64) -> Expr {
    Expr::Value(Value::Float64(v))
}

pub fn boolean(v: bool) -> Expr {
    Expr::Value(Value::Bool(v))
}

pub fn time(v: DateTime<Utc>) -> Expr {
    Expr::Value(Value::Time(v))
}

/// A JSON document bound as a string literal.
///
/// Serialization failures surface when the statement is built.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Expr {
    match serde_json::to_string(value) {
        Ok(s) => Expr::Value(Value::String(s)),
        Err(e) => Expr::Invalid(format!("json literal: {e}")),
    }
}
