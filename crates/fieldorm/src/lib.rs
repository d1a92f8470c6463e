//! # fieldorm
//!
//! Typed field expressions, MySQL-flavoured statement builders and validated
//! record-to-table bindings.
//!
//! ## Features
//!
//! - **SQL explicit**: every builder renders plain SQL with `?` placeholders and an ordered argument list
//! - **Typed fields**: `Int64Field`, `StringField`, ... only accept values of their own type
//! - **Safe defaults**: empty conditions vanish instead of rendering `()`, UPDATE requires SET
//! - **Validated bindings**: `Orm::new` checks a record, its partial twin and a table against each other once
//! - **Bring your own driver**: anything that implements [`Engine`] executes statements, or a [`LazyEngine`] resolves one per call
//! - **Query monitoring**: [`monitor::InstrumentedEngine`] times, logs and counts engine calls
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use fieldorm::{Table, qb};
//!
//! let mut users = Table::new("users");
//! let id = users.int64("id");
//! let name = users.string("name");
//!
//! // SELECT `users`.`id`, `users`.`name` FROM `users` WHERE `users`.`name` LIKE ? LIMIT 10
//! let built = qb::select(users.all_fields())
//!     .from(users.name())
//!     .and_where(name.starts_with("al"))
//!     .limit(10)
//!     .build()?;
//!
//! // UPDATE `users` SET `name`=? WHERE `users`.`id` = ?
//! qb::update(users.name())
//!     .set(&name, "alice")
//!     .and_where(id.eq(7))
//!     .execute(&engine)
//!     .await?;
//! ```
//!
//! ## Bindings
//!
//! ```ignore
//! let orm: Orm<User, UserOptional, _> = Orm::new(&users, engine)?;
//! let id = orm.insert(&user).await?;
//! let user = orm.get_by_id(id).await?;
//! ```

extern crate self as fieldorm;

pub mod engine;
pub mod error;
pub mod field;
pub mod monitor;
pub mod orm;
pub mod qb;
pub mod record;
pub mod row;
pub mod table;
pub mod value;

mod validate;

pub use engine::{Engine, EngineFactory, LazyEngine};
pub use error::{OrmError, OrmResult, ValidationError};
pub use field::{
    AsField, BoolField, Field, Float64Field, Int32Field, Int64Field, StringField, TimeField,
};
pub use monitor::{InstrumentedEngine, MonitorConfig, QueryStats, QueryType};
pub use orm::{Orm, OrmCount, OrmSelect, OrmUpdate};
pub use record::{FieldDesc, Partial, Record};
pub use row::{FromRow, Row};
pub use table::{ColumnType, Table, TableField};
pub use value::{ColumnValue, Value, ValueKind, is_zero_time};

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, DeleteQb, Expr, InsertQb, MutationQb, SelectQb, SqlQb, UpdateQb, delete_from,
    insert_into, select, update,
};

#[cfg(feature = "derive")]
pub use fieldorm_derive::{FromRow, Partial, Record};
