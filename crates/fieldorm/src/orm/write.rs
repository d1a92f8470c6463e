//! Insert, update and delete through a binding.

use super::{Orm, example_pairs};
use crate::engine::Engine;
use crate::error::{OrmError, OrmResult};
use crate::field::AsField;
use crate::qb::{DeleteQb, Expr, InsertQb, SqlQb, UpdateQb};
use crate::record::{Partial, Record};
use crate::value::{Value, is_zero_time};
use chrono::Utc;

const CREATE_TIME: &str = "create_time";
const UPDATE_TIME: &str = "update_time";

impl<T: Record, P: Partial, E: Engine> Orm<T, P, E> {
    /// Insert every mapped field of `record` and return the generated id.
    ///
    /// `create_time` / `update_time` left at the epoch are set to now.
    pub async fn insert(&self, record: &T) -> OrmResult<i64> {
        let now = Utc::now();
        let mut qb = InsertQb::new(self.table.name());
        for (desc, value) in T::FIELDS.iter().zip(record.values()) {
            if desc.is_count() {
                continue;
            }
            let Some(column) = self.table.field(desc.column) else {
                return Err(OrmError::build(format!(
                    "field {} not found in table {}",
                    desc.column,
                    self.table.name()
                )));
            };
            let value = if (desc.column == CREATE_TIME || desc.column == UPDATE_TIME)
                && is_zero_time(&value)
            {
                Value::Time(now)
            } else {
                value
            };
            qb = qb.set(&column.field, value);
        }

        let built = qb.build()?;
        self.log_statement("insert", &built);
        self.engine.exec_insert(&built.sql, &built.params).await
    }

    /// Apply the `Some` fields of `data` to the row with this id.
    pub async fn update_by_id(&self, id: i64, data: &P) -> OrmResult<u64> {
        let cond = self.id_condition(id)?;
        self.update_where(vec![cond], data).await
    }

    /// Apply the `Some` fields of `data` to every row matching `cond`.
    pub async fn update_by(&self, cond: &P, data: &P) -> OrmResult<u64> {
        self.update_where(self.to_conditions(cond), data).await
    }

    async fn update_where(&self, conditions: Vec<Expr>, data: &P) -> OrmResult<u64> {
        if conditions.is_empty() {
            return Err(OrmError::invalid_argument("update requires conditions"));
        }

        let mut qb = UpdateQb::new(self.table.name());
        let mut stamp_update_time = false;
        for (desc, value) in P::FIELDS.iter().zip(data.values()) {
            let Some(value) = value else {
                stamp_update_time |= desc.column == UPDATE_TIME;
                continue;
            };
            if let Some(column) = self.table.field(desc.column) {
                qb = qb.set(&column.field, value);
            }
        }
        if qb.set_count() == 0 {
            return Err(OrmError::NothingToUpdate);
        }
        if stamp_update_time {
            if let Some(column) = self.table.field(UPDATE_TIME) {
                qb = qb.set(&column.field, Value::Time(Utc::now()));
            }
        }

        let built = qb.and_where_all(conditions).build()?;
        self.log_statement("update", &built);
        self.engine.exec(&built.sql, &built.params).await
    }

    /// Free-form UPDATE on this table.
    pub fn update(&self) -> OrmUpdate<'_, T, P, E> {
        OrmUpdate {
            orm: self,
            builder: UpdateQb::new(self.table.name()),
        }
    }

    pub async fn delete_by_id(&self, id: i64) -> OrmResult<u64> {
        let cond = self.id_condition(id)?;
        self.delete_where(vec![cond]).await
    }

    /// Delete rows matching the `Some` fields of `cond`; at least one is required.
    pub async fn delete_by(&self, cond: &P) -> OrmResult<u64> {
        if example_pairs(cond).is_empty() {
            return Err(OrmError::invalid_argument("delete requires conditions"));
        }
        self.delete_where(self.to_conditions(cond)).await
    }

    pub async fn delete_where(&self, conditions: Vec<Expr>) -> OrmResult<u64> {
        if conditions.is_empty() {
            return Err(OrmError::invalid_argument("delete requires conditions"));
        }
        let built = DeleteQb::new(self.table.name())
            .and_where_all(conditions)
            .build()?;
        self.log_statement("delete", &built);
        self.engine.exec(&built.sql, &built.params).await
    }
}

/// UPDATE builder bound to an [`Orm`].
pub struct OrmUpdate<'a, T, P, E> {
    orm: &'a Orm<T, P, E>,
    builder: UpdateQb,
}

impl<T: Record, P: Partial, E: Engine> OrmUpdate<'_, T, P, E> {
    pub fn set(mut self, field: &impl AsField, value: impl Into<Expr>) -> Self {
        self.builder = self.builder.set(field, value);
        self
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.builder = self.builder.and_where(cond);
        self
    }

    pub async fn exec(self) -> OrmResult<u64> {
        let built = self.builder.build()?;
        self.orm.log_statement("update", &built);
        self.orm.engine.exec(&built.sql, &built.params).await
    }
}
