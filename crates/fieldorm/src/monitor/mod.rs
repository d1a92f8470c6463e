//! Timing, logging and statistics around engine calls.
//!
//! Wrap any [`Engine`](crate::Engine) in an [`InstrumentedEngine`] and pass
//! the wrapper wherever the bare engine went. Nothing else changes: builders
//! and bindings see an ordinary engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldorm::monitor::{InstrumentedEngine, MonitorConfig, QueryType};
//! use std::time::Duration;
//!
//! let engine = InstrumentedEngine::new(driver).with_config(
//!     MonitorConfig::new()
//!         .with_slow_query_threshold(Duration::from_millis(100))
//!         .with_log_args(true),
//! );
//!
//! // ... run queries ...
//!
//! let stats = engine.stats();
//! println!("{} selects, {} slow", stats.count_for(QueryType::Select), stats.slow_queries);
//! ```

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_MAX_SQL_LENGTH, MonitorConfig};
pub use instrumented::InstrumentedEngine;
pub use monitors::{CompositeMonitor, NoopMonitor, QueryStats, StatsMonitor};
pub use types::{QueryContext, QueryMonitor, QueryResult, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
