use std::time::Duration;

/// Bytes of SQL kept in log events unless configured otherwise.
pub const DEFAULT_MAX_SQL_LENGTH: usize = 200;

/// Knobs of an [`InstrumentedEngine`](super::InstrumentedEngine).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Calls taking longer are logged at WARN and counted as slow.
    pub slow_query_threshold: Option<Duration>,
    /// `None` keeps statements whole.
    pub max_sql_length: Option<usize>,
    /// Attach the bound values to DEBUG events.
    pub log_args: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold: None,
            max_sql_length: Some(DEFAULT_MAX_SQL_LENGTH),
            log_args: false,
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slow_query_threshold(self, threshold: Duration) -> Self {
        Self {
            slow_query_threshold: Some(threshold),
            ..self
        }
    }

    pub fn with_max_sql_length(self, len: usize) -> Self {
        Self {
            max_sql_length: Some(len),
            ..self
        }
    }

    pub fn no_truncate(self) -> Self {
        Self {
            max_sql_length: None,
            ..self
        }
    }

    pub fn with_log_args(self, log_args: bool) -> Self {
        Self { log_args, ..self }
    }

    pub(crate) fn is_slow(&self, duration: Duration) -> bool {
        matches!(self.slow_query_threshold, Some(limit) if duration > limit)
    }

    /// The statement as it appears in log events, `...` marking a cut.
    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        let Some(limit) = self.max_sql_length.filter(|&limit| sql.len() > limit) else {
            return sql.to_owned();
        };
        let mut shown = super::truncate_sql_bytes(sql, limit).to_owned();
        shown.push_str("...");
        shown
    }
}
