//! Generic query-statement abstraction.
//!
//! A `Statement` is SQL text plus ordered bind parameters carried as plain
//! JSON values, so callers can hand statements to the store without touching
//! engine-specific argument types.

use serde_json::Value;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    binds: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Append one positional bind parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.binds.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    /// Wrap this statement in a COUNT(*) for pagination totals.
    pub(crate) fn counted(&self) -> Statement {
        Statement {
            sql: format!("SELECT COUNT(*) FROM ({}) AS page_source", self.sql),
            binds: self.binds.clone(),
        }
    }

    /// Append LIMIT/OFFSET for one page of results.
    pub(crate) fn paged(&self, limit: i64, offset: i64) -> Statement {
        let mut binds = self.binds.clone();
        binds.push(Value::from(limit));
        binds.push(Value::from(offset));
        Statement {
            sql: format!("{} LIMIT ? OFFSET ?", self.sql),
            binds,
        }
    }

    /// Materialize an executable query with all binds applied.
    pub(crate) fn query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        let mut query = sqlx::query(self.sql.as_str());
        for value in &self.binds {
            query = bind_value(query, value);
        }
        query
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => query.bind(s.clone()),
        // Arrays and objects are persisted as JSON text.
        other => query.bind(other.to_string()),
    }
}
