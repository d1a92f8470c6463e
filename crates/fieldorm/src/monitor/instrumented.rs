use super::config::MonitorConfig;
use super::monitors::{NoopMonitor, QueryStats, StatsMonitor};
use super::types::{QueryContext, QueryMonitor, QueryResult};
use crate::engine::Engine;
use crate::error::OrmResult;
use crate::orm::SQL_TARGET;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An [`Engine`] wrapper that times, logs and counts every call.
///
/// Every call emits a DEBUG event on the `fieldorm.sql` target. Calls over
/// the slow threshold additionally emit a WARN, and engine failures an
/// ERROR. Statistics are always collected and readable via [`stats`].
///
/// ```ignore
/// let engine = InstrumentedEngine::new(pool)
///     .with_config(MonitorConfig::new().with_slow_query_threshold(Duration::from_millis(50)));
/// let users = Orm::<User, UserPatch, _>::new(&users_table, engine)?;
/// ```
///
/// [`stats`]: InstrumentedEngine::stats
pub struct InstrumentedEngine<E> {
    engine: E,
    config: MonitorConfig,
    stats: Arc<StatsMonitor>,
    monitor: Arc<dyn QueryMonitor>,
}

impl<E: Engine> InstrumentedEngine<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: MonitorConfig::default(),
            stats: Arc::new(StatsMonitor::new()),
            monitor: Arc::new(NoopMonitor),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Forward events to an additional monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Snapshot of the counters collected so far.
    pub fn stats(&self) -> QueryStats {
        self.stats.stats()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    pub fn inner(&self) -> &E {
        &self.engine
    }

    pub fn into_inner(self) -> E {
        self.engine
    }

    async fn observe<T, F>(
        &self,
        sql: &str,
        args: &[Value],
        call: F,
        summarize: fn(&T) -> QueryResult,
    ) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        let ctx = QueryContext::new(sql, args.len());
        self.log_start(&ctx, args);
        self.stats.on_query_start(&ctx);
        self.monitor.on_query_start(&ctx);

        let start = Instant::now();
        let result = call.await;
        let duration = start.elapsed();

        let outcome = match &result {
            Ok(value) => summarize(value),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report(&ctx, duration, &outcome);
        result
    }

    fn log_start(&self, ctx: &QueryContext, args: &[Value]) {
        let sql = self.config.truncate_sql(&ctx.sql);
        if self.config.log_args {
            tracing::debug!(
                target: SQL_TARGET,
                query_type = %ctx.query_type,
                param_count = ctx.param_count,
                args = ?args,
                sql = %sql,
            );
        } else {
            tracing::debug!(
                target: SQL_TARGET,
                query_type = %ctx.query_type,
                param_count = ctx.param_count,
                sql = %sql,
            );
        }
    }

    fn report(&self, ctx: &QueryContext, duration: Duration, outcome: &QueryResult) {
        if let QueryResult::Error(message) = outcome {
            tracing::error!(
                target: SQL_TARGET,
                query_type = %ctx.query_type,
                elapsed = ?duration,
                error = %message,
                sql = %self.config.truncate_sql(&ctx.sql),
                "engine call failed"
            );
        }

        self.stats.on_query_complete(ctx, duration, outcome);
        self.monitor.on_query_complete(ctx, duration, outcome);

        if self.config.is_slow(duration) {
            tracing::warn!(
                target: SQL_TARGET,
                query_type = %ctx.query_type,
                elapsed = ?duration,
                sql = %self.config.truncate_sql(&ctx.sql),
                "slow query"
            );
            self.stats.on_slow_query(ctx, duration);
            self.monitor.on_slow_query(ctx, duration);
        }
    }
}

impl<E: Engine> Engine for InstrumentedEngine<E> {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        self.observe(sql, args, self.engine.query(sql, args), |rows| {
            QueryResult::Rows(rows.len())
        })
        .await
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        self.observe(sql, args, self.engine.exec(sql, args), |n| {
            QueryResult::Affected(*n)
        })
        .await
    }

    async fn exec_insert(&self, sql: &str, args: &[Value]) -> OrmResult<i64> {
        self.observe(sql, args, self.engine.exec_insert(sql, args), |id| {
            QueryResult::Inserted(*id)
        })
        .await
    }
}

impl<E> std::fmt::Debug for InstrumentedEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentedEngine")
            .field("config", &self.config)
            .field("stats", &self.stats.stats())
            .finish_non_exhaustive()
    }
}
