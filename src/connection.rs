//! DuckDB connection wrapper with schema initialization and query execution.
//!
//! The schema is created idempotently when a connection is opened, so the
//! same database file can be reopened across process restarts.

use crate::config;
use crate::error::Result;
use crate::sql_builder::SqlValue;
use chrono::{DateTime, Utc};
use duckdb::{
    types::{TimeUnit, ValueRef},
    Connection as DuckDbConnection,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// DDL for every table the query engine reads or writes.
fn schema_sql() -> String {
    format!(
        "CREATE SEQUENCE IF NOT EXISTS price_id_seq START 1;
         CREATE TABLE IF NOT EXISTS {stations} (
             id BIGINT NOT NULL,
             name VARCHAR,
             address VARCHAR,
             longitude DOUBLE,
             latitude DOUBLE
         );
         CREATE TABLE IF NOT EXISTS {prices} (
             id BIGINT NOT NULL DEFAULT nextval('price_id_seq'),
             station_id BIGINT,
             gas_id INTEGER NOT NULL,
             gas_name VARCHAR NOT NULL,
             price DOUBLE NOT NULL,
             last_update TIMESTAMP NOT NULL
         );
         CREATE TABLE IF NOT EXISTS {station_prices} (
             station_id BIGINT NOT NULL,
             price_id BIGINT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS {schedules} (
             station_id BIGINT NOT NULL,
             schedule_id INTEGER NOT NULL,
             day VARCHAR,
             open BOOLEAN,
             opening VARCHAR,
             closing VARCHAR
         );
         CREATE TABLE IF NOT EXISTS {current_prices} (
             station_id BIGINT NOT NULL,
             gas_name VARCHAR NOT NULL,
             price DOUBLE
         );
         CREATE TABLE IF NOT EXISTS {price_trends} (
             period VARCHAR NOT NULL,
             station_id BIGINT NOT NULL,
             evolution VARCHAR,
             updated_at TIMESTAMP,
             PRIMARY KEY (period, station_id)
         );",
        stations = config::STATIONS_TABLE,
        prices = config::PRICES_TABLE,
        station_prices = config::STATION_PRICES_TABLE,
        schedules = config::SCHEDULES_TABLE,
        current_prices = config::CURRENT_PRICES_TABLE,
        price_trends = config::PRICE_TRENDS_TABLE,
    )
}

/// Wraps a DuckDB connection holding the station, price and trend tables.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an in-memory database and create the schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Self::with_schema(conn)
    }

    /// Open (or create) an on-disk database and create the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = DuckDbConnection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "opened fuel price database");
        Self::with_schema(conn)
    }

    fn with_schema(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(&schema_sql())?;
        Ok(Self { conn })
    }

    /// Open a second connection to the same database.
    ///
    /// Each clone can be moved to its own thread; DuckDB serializes
    /// conflicting writes between them.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            conn: self.conn.try_clone()?,
        })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        debug!(sql, params = params.len(), "executing query");
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let column_names: Vec<String> = match rows_result.as_ref() {
            Some(executed) => executed
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            None => Vec::new(),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                let value = convert_value_ref(row.get_ref(i)?);
                map.insert(col_name.clone(), value);
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    ///
    /// First executes the query as `HashMap` rows, then deserializes each
    /// row using `serde_json`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(
                row.into_iter().collect::<serde_json::Map<String, serde_json::Value>>(),
            );
            let item: T = serde_json::from_value(value)?;
            results.push(item);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            let value = convert_value_ref(row.get_ref(0)?);
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Execute a data-modifying statement and return the affected row count.
    pub fn execute_statement(&self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        debug!(sql, params = params.len(), "executing statement");
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();
        Ok(self.conn.execute(sql, param_values.as_slice())?)
    }

    /// Run `f` inside a transaction, committing on success and rolling back on error.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                // Report the callback's error, not the rollback's
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
///
/// Timestamps become RFC 3339 strings so they deserialize straight into
/// `chrono::DateTime<Utc>` fields.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; try i64, fallback to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            DateTime::<Utc>::from_timestamp_micros(micros)
                .map(|ts| serde_json::Value::String(ts.to_rfc3339()))
                .unwrap_or(serde_json::Value::Null)
        }
        // Lists, structs and other composite types are never selected
        _ => serde_json::Value::Null,
    }
}
