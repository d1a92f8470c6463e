//! INSERT query builder using the unified expression layer.
//!
//! Renders the MySQL `INSERT INTO ... SET` form, which shares its
//! assignment list with UPDATE.

use crate::engine::Engine;
use crate::error::{OrmError, OrmResult};
use crate::field::AsField;
use crate::qb::expr::Expr;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQb, SqlQb};
use crate::qb::update::SetList;

/// INSERT query builder.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    sets: SetList,
}

impl InsertQb {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: SetList::default(),
        }
    }

    /// Add `` `field`=<value> ``.
    pub fn set(mut self, field: &impl AsField, value: impl Into<Expr>) -> Self {
        self.sets.push(field, value.into());
        self
    }

    /// Set only when `value` is `Some`.
    pub fn set_opt<V: Into<Expr>>(self, field: &impl AsField, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    /// Execute and return the generated id.
    pub async fn execute_insert(&self, engine: &impl Engine) -> OrmResult<i64> {
        let built = self.build()?;
        engine.exec_insert(&built.sql, &built.params).await
    }

    fn build_insert(&self) -> OrmResult<BuiltQuery> {
        self.sets.staged_error()?;
        if self.table.is_empty() {
            return Err(OrmError::build("table name is required"));
        }
        if self.sets.is_empty() {
            return Err(OrmError::build("no columns specified"));
        }

        let mut params = ParamList::new();
        let mut sql = format!("INSERT INTO `{}` SET ", self.table);
        self.sets.write(&mut sql, &mut params);
        Ok(BuiltQuery::new(sql, params.into_vec()))
    }
}

impl SqlQb for InsertQb {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_insert()
    }
}

impl MutationQb for InsertQb {}
