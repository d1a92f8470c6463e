//! DELETE query builder using the unified expression layer.

use crate::error::{OrmError, OrmResult};
use crate::qb::expr::Expr;
use crate::qb::param::ParamList;
use crate::qb::traits::{BuiltQuery, MutationQb, SqlQb};

/// DELETE query builder.
///
/// WHERE entries are joined inline with `AND` (entries rendering empty are
/// skipped one by one), not wrapped into an `and()` group.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    conditions: Vec<Expr>,
    limit: Option<u64>,
}

impl DeleteQb {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
            limit: None,
        }
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.conditions.push(cond);
        self
    }

    pub fn and_where_all(mut self, conds: impl IntoIterator<Item = Expr>) -> Self {
        self.conditions.extend(conds);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    fn build_delete(&self) -> OrmResult<BuiltQuery> {
        if self.table.is_empty() {
            return Err(OrmError::build("table name is required"));
        }

        let mut params = ParamList::new();
        let mut sql = format!("DELETE FROM `{}`", self.table);

        let where_sql = crate::qb::select::join_clause(
            &self.conditions,
            " AND ",
            &mut params,
            "where condition",
        )?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(BuiltQuery::new(sql, params.into_vec()))
    }
}

impl SqlQb for DeleteQb {
    fn build(&self) -> OrmResult<BuiltQuery> {
        self.build_delete()
    }
}

impl MutationQb for DeleteQb {}
