//! Lookups, selects and counts through a binding.

use super::{Orm, describe_pairs, example_pairs};
use crate::engine::Engine;
use crate::error::{OrmError, OrmResult};
use crate::field::AsField;
use crate::qb::{self, BuiltQuery, Expr, SelectQb, SqlQb};
use crate::record::{FieldDesc, Partial, Record};
use crate::row::FromRow;

impl<T: Record, P: Partial, E: Engine> Orm<T, P, E> {
    pub async fn get_by_id(&self, id: i64) -> OrmResult<T> {
        let cond = self.id_condition(id)?;
        self.get_where(vec![cond], || format!("id={id}")).await
    }

    /// First row matching the `Some` fields of `cond`.
    pub async fn get_by(&self, cond: &P) -> OrmResult<T> {
        let pairs = example_pairs(cond);
        self.get_where(self.to_conditions(cond), || describe_pairs(&pairs))
            .await
    }

    async fn get_where(
        &self,
        conditions: Vec<Expr>,
        describe: impl FnOnce() -> String,
    ) -> OrmResult<T> {
        let built = qb::select(self.table.all_fields())
            .from(self.table.name())
            .and_where_all(conditions)
            .limit(1)
            .build()?;
        self.log_statement("get", &built);
        let rows = self.engine.query(&built.sql, &built.params).await?;
        match rows.first() {
            Some(row) => T::from_row(row),
            None => Err(OrmError::not_found(format!(
                "{} not found with: {}",
                self.table.name(),
                describe()
            ))),
        }
    }

    /// SELECT every table field.
    pub fn select_all(&self) -> OrmSelect<'_, T, P, E> {
        self.select_expr(self.table.all_fields())
    }

    /// SELECT the given fields.
    ///
    /// ```ignore
    /// users.select(&[&user.id, &user.name]).and_where(user.id.gt(10)).query().await?;
    /// ```
    pub fn select(&self, fields: &[&dyn AsField]) -> OrmSelect<'_, T, P, E> {
        self.select_expr(fields.iter().map(|f| f.expr()).collect())
    }

    /// SELECT arbitrary expressions (functions, aliases, aggregates).
    pub fn select_expr(&self, exprs: Vec<Expr>) -> OrmSelect<'_, T, P, E> {
        OrmSelect {
            orm: self,
            builder: qb::select(exprs).from(self.table.name()),
        }
    }

    /// ``SELECT COUNT(*) AS `count`, <fields>``; `T` needs a `count: i64` field.
    pub fn count(&self, fields: Vec<Expr>) -> OrmResult<OrmCount<'_, T, P, E>> {
        self.count_of(qb::all(), fields)
    }

    /// Like [`Orm::count`] with an explicit COUNT target.
    pub fn count_of(
        &self,
        target: impl Into<Expr>,
        fields: Vec<Expr>,
    ) -> OrmResult<OrmCount<'_, T, P, E>> {
        if !T::FIELDS.iter().any(FieldDesc::is_count) {
            return Err(OrmError::MissingCountField);
        }
        let mut exprs = Vec::with_capacity(fields.len() + 1);
        exprs.push(qb::count(target).as_("count"));
        exprs.extend(fields);
        Ok(OrmCount {
            orm: self,
            builder: qb::select(exprs).from(self.table.name()),
        })
    }

    async fn fetch(&self, op: &'static str, built: &BuiltQuery) -> OrmResult<Vec<T>> {
        self.log_statement(op, built);
        let rows = self.engine.query(&built.sql, &built.params).await?;
        rows.iter().map(T::from_row).collect()
    }
}

/// SELECT builder bound to an [`Orm`]; rows map back to `T`.
pub struct OrmSelect<'a, T, P, E> {
    orm: &'a Orm<T, P, E>,
    builder: SelectQb,
}

impl<T: Record, P: Partial, E: Engine> OrmSelect<'_, T, P, E> {
    pub fn exclude(mut self, field: &impl AsField) -> Self {
        self.builder = self.builder.exclude(field);
        self
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.builder = self.builder.and_where(cond);
        self
    }

    pub fn join(mut self, table: impl Into<String>, on: Expr) -> Self {
        self.builder = self.builder.join(table, on);
        self
    }

    pub fn left_join(mut self, table: impl Into<String>, on: Expr) -> Self {
        self.builder = self.builder.left_join(table, on);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.builder = self.builder.group_by(expr);
        self
    }

    pub fn and_having(mut self, cond: Expr) -> Self {
        self.builder = self.builder.and_having(cond);
        self
    }

    pub fn order_by(mut self, order: Expr) -> Self {
        self.builder = self.builder.order_by(order);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.builder = self.builder.limit(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.builder = self.builder.offset(n);
        self
    }

    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.builder.build()
    }

    pub async fn query(&self) -> OrmResult<Vec<T>> {
        let built = self.builder.build()?;
        self.orm.fetch("select", &built).await
    }

    /// First matching record, if any (adds `LIMIT 1`).
    pub async fn query_one(&self) -> OrmResult<Option<T>> {
        let built = self.builder.clone().limit(1).build()?;
        Ok(self.orm.fetch("select", &built).await?.into_iter().next())
    }

    /// Like [`OrmSelect::query_one`], but no row is an error.
    pub async fn require_one(&self) -> OrmResult<T> {
        self.query_one().await?.ok_or_else(|| {
            OrmError::not_found(format!("{} record not found", self.orm.table.name()))
        })
    }

    /// Map rows into a caller-chosen shape, e.g. a join or aggregate result.
    pub async fn query_into<R: FromRow>(&self) -> OrmResult<Vec<R>> {
        let built = self.builder.build()?;
        self.orm.log_statement("select", &built);
        let rows = self.orm.engine.query(&built.sql, &built.params).await?;
        rows.iter().map(R::from_row).collect()
    }
}

/// COUNT builder bound to an [`Orm`].
pub struct OrmCount<'a, T, P, E> {
    orm: &'a Orm<T, P, E>,
    builder: SelectQb,
}

impl<T: Record, P: Partial, E: Engine> OrmCount<'_, T, P, E> {
    pub fn and_where(mut self, cond: Expr) -> Self {
        self.builder = self.builder.and_where(cond);
        self
    }

    pub fn exclude(mut self, field: &impl AsField) -> Self {
        self.builder = self.builder.exclude(field);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.builder = self.builder.group_by(expr);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.builder = self.builder.limit(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.builder = self.builder.offset(n);
        self
    }

    pub fn build(&self) -> OrmResult<BuiltQuery> {
        self.builder.build()
    }

    /// The `count` column of the first row.
    pub async fn query(&self) -> OrmResult<i64> {
        let built = self.builder.clone().limit(1).build()?;
        self.orm.log_statement("count", &built);
        let rows = self.orm.engine.query(&built.sql, &built.params).await?;
        let row = rows
            .first()
            .ok_or_else(|| OrmError::not_found("count query expects at least one row"))?;
        row.get_or_default::<i64>("count")
    }

    /// One record per group, each carrying its `count`.
    pub async fn query_many(&self) -> OrmResult<Vec<T>> {
        let built = self.builder.build()?;
        self.orm.fetch("count", &built).await
    }

    pub async fn query_one_data(&self) -> OrmResult<Option<T>> {
        let built = self.builder.clone().limit(1).build()?;
        Ok(self.orm.fetch("count", &built).await?.into_iter().next())
    }
}
