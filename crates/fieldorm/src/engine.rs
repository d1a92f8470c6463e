//! The execution boundary.
//!
//! fieldorm never talks to a database itself. Anything that can run a SQL
//! string with `?` placeholders (a driver connection, a pool, a test double)
//! implements [`Engine`], and the builders and the [`Orm`](crate::Orm)
//! binding hand it rendered statements.

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;

/// A trait that unifies whatever executes SQL.
pub trait Engine: Send + Sync {
    /// Execute a query and return all rows.
    fn query(&self, sql: &str, args: &[Value])
    -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn exec(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<u64>> + Send;

    /// Execute an INSERT and return the generated id.
    fn exec_insert(&self, sql: &str, args: &[Value])
    -> impl Future<Output = OrmResult<i64>> + Send;
}

impl<E: Engine> Engine for &E {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, args)
    }

    fn exec(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<u64>> + Send {
        (**self).exec(sql, args)
    }

    fn exec_insert(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<i64>> + Send {
        (**self).exec_insert(sql, args)
    }
}

impl<E: Engine> Engine for Arc<E> {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, args)
    }

    fn exec(&self, sql: &str, args: &[Value]) -> impl Future<Output = OrmResult<u64>> + Send {
        (**self).exec(sql, args)
    }

    fn exec_insert(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = OrmResult<i64>> + Send {
        (**self).exec_insert(sql, args)
    }
}

/// Produces the engine for each call.
///
/// Lets an [`Orm`](crate::Orm) or monitor stack be assembled before the
/// pool behind it exists. Any `Fn() -> OrmResult<E>` closure qualifies.
pub trait EngineFactory: Send + Sync {
    type Engine: Engine;

    fn engine(&self) -> OrmResult<Self::Engine>;
}

impl<F, E> EngineFactory for F
where
    F: Fn() -> OrmResult<E> + Send + Sync,
    E: Engine,
{
    type Engine = E;

    fn engine(&self) -> OrmResult<E> {
        self()
    }
}

/// An [`Engine`] resolved through an [`EngineFactory`] on every call.
///
/// A factory error is returned as the call's error and nothing is executed.
#[derive(Debug, Clone)]
pub struct LazyEngine<F> {
    factory: F,
}

impl<F: EngineFactory> LazyEngine<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F: EngineFactory> Engine for LazyEngine<F> {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let engine = self.factory.engine()?;
        engine.query(sql, args).await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let engine = self.factory.engine()?;
        engine.exec(sql, args).await
    }

    async fn exec_insert(&self, sql: &str, args: &[Value]) -> OrmResult<i64> {
        let engine = self.factory.engine()?;
        engine.exec_insert(sql, args).await
    }
}
