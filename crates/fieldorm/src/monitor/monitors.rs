use super::types::{QueryContext, QueryMonitor, QueryResult, QueryType};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

const KINDS: usize = QueryType::ALL.len();

/// Lock-free call counters, shared between concurrent engine calls.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    calls: AtomicU64,
    failures: AtomicU64,
    slow: AtomicU64,
    nanos_total: AtomicU64,
    nanos_max: AtomicU64,
    per_kind: [AtomicU64; KINDS],
    slowest_sql: Mutex<Option<String>>,
}

/// A point-in-time copy of a [`StatsMonitor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    pub total_queries: u64,
    pub failed_queries: u64,
    pub slow_queries: u64,
    /// Saturates instead of wrapping.
    pub total_duration: Duration,
    pub max_duration: Duration,
    pub slowest_query: Option<String>,
    by_type: [u64; KINDS],
}

impl QueryStats {
    pub fn count_for(&self, query_type: QueryType) -> u64 {
        self.by_type[query_type.index()]
    }
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> QueryStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        QueryStats {
            total_queries: load(&self.calls),
            failed_queries: load(&self.failures),
            slow_queries: load(&self.slow),
            total_duration: Duration::from_nanos(load(&self.nanos_total)),
            max_duration: Duration::from_nanos(load(&self.nanos_max)),
            slowest_query: self.slowest_sql().clone(),
            by_type: std::array::from_fn(|i| load(&self.per_kind[i])),
        }
    }

    pub fn reset(&self) {
        let totals = [
            &self.calls,
            &self.failures,
            &self.slow,
            &self.nanos_total,
            &self.nanos_max,
        ];
        for counter in totals.into_iter().chain(&self.per_kind) {
            counter.store(0, Ordering::Relaxed);
        }
        *self.slowest_sql() = None;
    }

    fn slowest_sql(&self) -> MutexGuard<'_, Option<String>> {
        // a poisoned guard still holds a whole Option
        self.slowest_sql
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn add_duration(&self, nanos: u64) {
        let _ = self
            .nanos_total
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(nanos))
            });
    }

    /// True when `nanos` became the new maximum.
    fn raise_max(&self, nanos: u64) -> bool {
        self.nanos_max
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |max| {
                (nanos > max).then_some(nanos)
            })
            .is_ok()
    }
}

impl QueryMonitor for StatsMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.calls.fetch_add(1, Ordering::Relaxed);
        self.per_kind[ctx.query_type.index()].fetch_add(1, Ordering::Relaxed);
        if result.is_error() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.add_duration(nanos);
        if self.raise_max(nanos) {
            *self.slowest_sql() = Some(ctx.sql.clone());
        }
    }

    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {
        self.slow.fetch_add(1, Ordering::Relaxed);
    }
}

impl<M: QueryMonitor + ?Sized> QueryMonitor for Arc<M> {
    fn on_query_start(&self, ctx: &QueryContext) {
        (**self).on_query_start(ctx);
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        (**self).on_query_complete(ctx, duration, result);
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        (**self).on_slow_query(ctx, duration);
    }
}

/// Fans each event out to its members, in insertion order.
#[derive(Default)]
pub struct CompositeMonitor {
    members: Vec<Arc<dyn QueryMonitor>>,
}

impl CompositeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<M: QueryMonitor + 'static>(self, monitor: M) -> Self {
        self.add_arc(Arc::new(monitor))
    }

    pub fn add_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.members.push(monitor);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl QueryMonitor for CompositeMonitor {
    fn on_query_start(&self, ctx: &QueryContext) {
        self.members.iter().for_each(|m| m.on_query_start(ctx));
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.members
            .iter()
            .for_each(|m| m.on_query_complete(ctx, duration, result));
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        self.members
            .iter()
            .for_each(|m| m.on_slow_query(ctx, duration));
    }
}
