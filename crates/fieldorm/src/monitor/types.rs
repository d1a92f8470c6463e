use std::fmt;
use std::time::Duration;

/// Statement kind, taken from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// DDL, `SHOW`, hand-written statements...
    Other,
}

impl QueryType {
    pub const ALL: [QueryType; 5] = [
        QueryType::Select,
        QueryType::Insert,
        QueryType::Update,
        QueryType::Delete,
        QueryType::Other,
    ];

    /// Leading parentheses and whitespace are skipped, case is ignored.
    pub fn from_sql(sql: &str) -> Self {
        let head = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        let end = head
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(head.len());
        let keyword = &head[..end];
        Self::ALL[..4]
            .iter()
            .copied()
            .find(|kind| keyword.eq_ignore_ascii_case(kind.as_str()))
            .unwrap_or(QueryType::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Other => "OTHER",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a monitor learns about a call before it runs.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub sql: String,
    pub param_count: usize,
    pub query_type: QueryType,
}

impl QueryContext {
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            query_type: QueryType::from_sql(sql),
            sql: sql.to_owned(),
            param_count,
        }
    }
}

const ERROR_MESSAGE_LIMIT: usize = 512;

/// How a call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(usize),
    Affected(u64),
    Inserted(i64),
    /// The engine's message, cut at 512 bytes.
    Error(String),
}

impl QueryResult {
    pub fn error(message: String) -> Self {
        if message.len() <= ERROR_MESSAGE_LIMIT {
            return Self::Error(message);
        }
        let head = super::truncate_sql_bytes(&message, ERROR_MESSAGE_LIMIT);
        Self::Error(format!("{head}..."))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Inserted(id) => write!(f, "inserted id {id}"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Receives the events of an [`InstrumentedEngine`](super::InstrumentedEngine).
///
/// `on_query_complete` fires once per engine call, failures included.
/// `on_slow_query` follows it when the call went over the configured
/// threshold.
pub trait QueryMonitor: Send + Sync {
    fn on_query_start(&self, _ctx: &QueryContext) {}

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}
