use super::*;
use crate::engine::Engine;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Shared DummyEngine for tests ──

struct DummyEngine {
    delay: Duration,
}

impl DummyEngine {
    fn fast() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

impl Engine for DummyEngine {
    async fn query(&self, sql: &str, _: &[Value]) -> OrmResult<Vec<Row>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if sql.contains("missing_table") {
            return Err(OrmError::engine("table 'missing_table' doesn't exist"));
        }
        Ok(vec![Row::new().with("id", 1i64), Row::new().with("id", 2i64)])
    }

    async fn exec(&self, _: &str, _: &[Value]) -> OrmResult<u64> {
        Ok(3)
    }

    async fn exec_insert(&self, _: &str, _: &[Value]) -> OrmResult<i64> {
        Ok(42)
    }
}

#[derive(Default)]
struct RecordingMonitor {
    completed: Mutex<Vec<(QueryType, QueryResult)>>,
    slow: Mutex<Vec<String>>,
}

impl QueryMonitor for RecordingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, _: Duration, result: &QueryResult) {
        self.completed
            .lock()
            .unwrap()
            .push((ctx.query_type, result.clone()));
    }

    fn on_slow_query(&self, ctx: &QueryContext, _: Duration) {
        self.slow.lock().unwrap().push(ctx.sql.clone());
    }
}

#[test]
fn test_query_type_detection() {
    assert_eq!(QueryType::from_sql("SELECT * FROM `users`"), QueryType::Select);
    assert_eq!(QueryType::from_sql("  select 1"), QueryType::Select);
    assert_eq!(QueryType::from_sql("(SELECT 1) UNION (SELECT 2)"), QueryType::Select);
    assert_eq!(
        QueryType::from_sql("INSERT INTO `users` SET `name`=?"),
        QueryType::Insert
    );
    assert_eq!(QueryType::from_sql("UPDATE `users` SET `name`=?"), QueryType::Update);
    assert_eq!(
        QueryType::from_sql("DELETE FROM `users` WHERE `id` = ?"),
        QueryType::Delete
    );
    assert_eq!(QueryType::from_sql("SHOW TABLES"), QueryType::Other);
    assert_eq!(QueryType::from_sql(""), QueryType::Other);
    assert_eq!(QueryType::Delete.to_string(), "DELETE");
}

#[test]
fn test_truncation() {
    let config = MonitorConfig::new().with_max_sql_length(10);
    assert_eq!(config.truncate_sql("SELECT * FROM users"), "SELECT * F...");
    assert_eq!(config.truncate_sql("SELECT 1"), "SELECT 1");

    let long = "x".repeat(DEFAULT_MAX_SQL_LENGTH + 5);
    assert_eq!(MonitorConfig::new().no_truncate().truncate_sql(&long), long);
    assert_eq!(
        MonitorConfig::new().truncate_sql(&long).len(),
        DEFAULT_MAX_SQL_LENGTH + 3
    );
}

#[test]
fn test_truncation_respects_char_boundaries() {
    // 'é' is two bytes; cutting at 3 would split the second one.
    assert_eq!(truncate_sql_bytes("éé", 3), "é");
    assert_eq!(truncate_sql_bytes("abc", 0), "");
}

#[test]
fn test_error_result_truncated() {
    let QueryResult::Error(msg) = QueryResult::error("e".repeat(600)) else {
        panic!("expected error");
    };
    assert_eq!(msg.len(), 512 + 3);
    assert!(msg.ends_with("..."));
    assert_eq!(QueryResult::Rows(2).to_string(), "2 rows");
}

#[test]
fn test_config_defaults() {
    let config = MonitorConfig::default();
    assert_eq!(config.slow_query_threshold, None);
    assert_eq!(config.max_sql_length, Some(200));
    assert!(!config.log_args);
    assert!(!config.is_slow(Duration::from_secs(3600)));

    let config = config.with_slow_query_threshold(Duration::from_millis(5));
    assert!(config.is_slow(Duration::from_millis(6)));
    assert!(!config.is_slow(Duration::from_millis(5)));
}

#[test]
fn test_stats_monitor() {
    let monitor = StatsMonitor::new();
    let ctx = QueryContext::new("SELECT * FROM `users`", 0);

    monitor.on_query_complete(&ctx, Duration::from_millis(10), &QueryResult::Rows(5));
    monitor.on_query_complete(&ctx, Duration::from_millis(20), &QueryResult::Rows(3));
    let update = QueryContext::new("UPDATE `users` SET `name`=?", 1);
    monitor.on_query_complete(
        &update,
        Duration::from_millis(1),
        &QueryResult::error("boom".into()),
    );

    let stats = monitor.stats();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.count_for(QueryType::Select), 2);
    assert_eq!(stats.count_for(QueryType::Update), 1);
    assert_eq!(stats.failed_queries, 1);
    assert_eq!(stats.total_duration, Duration::from_millis(31));
    assert_eq!(stats.max_duration, Duration::from_millis(20));
    assert_eq!(stats.slowest_query.as_deref(), Some("SELECT * FROM `users`"));

    monitor.reset();
    assert_eq!(monitor.stats(), QueryStats::default());
}

#[test]
fn test_stats_duration_saturates() {
    let monitor = StatsMonitor::new();
    let ctx = QueryContext::new("SHOW TABLES", 0);
    monitor.on_query_complete(&ctx, Duration::MAX, &QueryResult::Rows(0));
    monitor.on_query_complete(&ctx, Duration::from_secs(1), &QueryResult::Rows(0));

    let stats = monitor.stats();
    assert_eq!(stats.total_duration, Duration::from_nanos(u64::MAX));
    assert_eq!(stats.max_duration, Duration::from_nanos(u64::MAX));
    assert_eq!(stats.count_for(QueryType::Other), 2);
}

#[test]
fn test_composite_monitor() {
    let a = Arc::new(StatsMonitor::new());
    let b = Arc::new(StatsMonitor::new());
    let composite = CompositeMonitor::new()
        .add_arc(a.clone())
        .add_arc(b.clone())
        .add(NoopMonitor);
    assert_eq!(composite.len(), 3);

    let ctx = QueryContext::new("DELETE FROM `t`", 0);
    composite.on_query_complete(&ctx, Duration::from_millis(1), &QueryResult::Affected(1));
    composite.on_slow_query(&ctx, Duration::from_millis(1));

    assert_eq!(a.stats().count_for(QueryType::Delete), 1);
    assert_eq!(b.stats().slow_queries, 1);
}

#[tokio::test]
async fn test_instrumented_engine_counts_calls() {
    let recorder = Arc::new(RecordingMonitor::default());
    let engine = InstrumentedEngine::new(DummyEngine::fast()).with_monitor_arc(recorder.clone());

    let rows = engine.query("SELECT `id` FROM `t`", &[]).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        engine
            .exec("UPDATE `t` SET `a`=?", &[Value::Int64(1)])
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        engine
            .exec_insert("INSERT INTO `t` SET `a`=?", &[Value::Int64(1)])
            .await
            .unwrap(),
        42
    );

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.count_for(QueryType::Select), 1);
    assert_eq!(stats.count_for(QueryType::Update), 1);
    assert_eq!(stats.count_for(QueryType::Insert), 1);
    assert_eq!(stats.failed_queries, 0);

    let completed = recorder.completed.lock().unwrap();
    assert_eq!(
        *completed,
        vec![
            (QueryType::Select, QueryResult::Rows(2)),
            (QueryType::Update, QueryResult::Affected(3)),
            (QueryType::Insert, QueryResult::Inserted(42)),
        ]
    );
}

#[tokio::test]
async fn test_instrumented_engine_passes_errors_through() {
    let engine = InstrumentedEngine::new(DummyEngine::fast());
    let err = engine
        .query("SELECT * FROM `missing_table`", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Engine(_)));

    let stats = engine.stats();
    assert_eq!(stats.total_queries, 1);
    assert_eq!(stats.failed_queries, 1);

    engine.reset_stats();
    assert_eq!(engine.stats().total_queries, 0);
}

#[tokio::test]
async fn test_slow_query_detection() {
    let recorder = Arc::new(RecordingMonitor::default());
    let engine = InstrumentedEngine::new(DummyEngine {
        delay: Duration::from_millis(30),
    })
    .with_config(MonitorConfig::new().with_slow_query_threshold(Duration::from_millis(5)))
    .with_monitor_arc(recorder.clone());

    engine.query("SELECT 1", &[]).await.unwrap();

    assert_eq!(engine.stats().slow_queries, 1);
    assert_eq!(*recorder.slow.lock().unwrap(), vec!["SELECT 1".to_string()]);
}

#[tokio::test]
async fn test_no_slow_queries_without_threshold() {
    let engine = InstrumentedEngine::new(DummyEngine {
        delay: Duration::from_millis(10),
    });
    engine.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(engine.stats().slow_queries, 0);
    assert_eq!(engine.inner().delay, Duration::from_millis(10));
}
