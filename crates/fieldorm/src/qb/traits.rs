//! Trait definitions for query builders.

use crate::engine::Engine;
use crate::error::OrmResult;
use crate::row::{FromRow, Row};
use crate::value::Value;

/// Base trait for all query builders.
///
/// Provides methods for building SQL and executing queries.
pub trait SqlQb: Sync {
    /// Render the statement and its arguments.
    fn build(&self) -> OrmResult<BuiltQuery>;

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> OrmResult<String> {
        Ok(self.build()?.sql)
    }

    /// Execute query and return all rows.
    fn query(
        &self,
        engine: &impl Engine,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        async move {
            let built = self.build()?;
            engine.query(&built.sql, &built.params).await
        }
    }

    /// Execute query and map all rows to `T`.
    fn fetch_all<T: FromRow>(
        &self,
        engine: &impl Engine,
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(engine).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute query and map the first row, if any, to `T`.
    fn fetch_opt<T: FromRow>(
        &self,
        engine: &impl Engine,
    ) -> impl std::future::Future<Output = OrmResult<Option<T>>> + Send {
        async move {
            let rows = self.query(engine).await?;
            rows.first().map(T::from_row).transpose()
        }
    }
}

/// Trait for mutation builders (INSERT/UPDATE/DELETE).
pub trait MutationQb: SqlQb {
    /// Execute and return affected row count.
    fn execute(
        &self,
        engine: &impl Engine,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            let built = self.build()?;
            engine.exec(&built.sql, &built.params).await
        }
    }
}

/// The result of building a query.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}
