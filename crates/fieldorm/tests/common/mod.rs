#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fieldorm::{
    Engine, Int32Field, Int64Field, OrmError, OrmResult, Partial, Record, Row, StringField, Table,
    TimeField, Value,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One engine call as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: &'static str,
    pub sql: String,
    pub args: Vec<Value>,
}

/// Engine double: records every call and answers queries from a script.
#[derive(Default)]
pub struct MockEngine {
    pub calls: Mutex<Vec<Call>>,
    pub results: Mutex<VecDeque<Vec<Row>>>,
    pub affected: u64,
    pub insert_id: i64,
    pub fail_with: Option<String>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            affected: 1,
            insert_id: 1,
            ..Self::default()
        }
    }

    /// Queue the rows returned by the next `query` call.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.results.lock().unwrap().push_back(rows);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Call {
        self.calls()
            .pop()
            .expect("expected at least one engine call")
    }

    fn record(&self, kind: &'static str, sql: &str, args: &[Value]) -> OrmResult<()> {
        self.calls.lock().unwrap().push(Call {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
        });
        match &self.fail_with {
            Some(msg) => Err(OrmError::engine(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Engine for MockEngine {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        self.record("query", sql, args)?;
        Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn exec(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        self.record("exec", sql, args)?;
        Ok(self.affected)
    }

    async fn exec_insert(&self, sql: &str, args: &[Value]) -> OrmResult<i64> {
        self.record("exec_insert", sql, args)?;
        Ok(self.insert_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct TestModel {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Partial)]
pub struct TestModelOptional {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

pub struct TestTable {
    pub table: Table,
    pub id: Int64Field,
    pub name: StringField,
    pub age: Int32Field,
    pub create_time: TimeField,
    pub update_time: TimeField,
}

pub fn test_table() -> TestTable {
    let mut table = Table::new("test_table");
    let id = table.int64("id");
    let name = table.string("name");
    let age = table.int32("age");
    let create_time = table.time("create_time");
    let update_time = table.time("update_time");
    TestTable {
        table,
        id,
        name,
        age,
        create_time,
        update_time,
    }
}

pub fn row(id: i64, name: &str, age: i32) -> Row {
    let t = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    Row::new()
        .with("id", id)
        .with("name", name)
        .with("age", age)
        .with("create_time", t)
        .with("update_time", t)
}
