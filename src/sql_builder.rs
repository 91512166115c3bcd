//! SQL builder with parameterized query construction.
//!
//! All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
//! never through string interpolation. Builder methods return `&mut Self` for chaining.
//!
//! Parameters are collected per clause (JOIN, WHERE, ORDER BY) and emitted in the
//! order those clauses appear in the final SQL, so conditions and sort keys can be
//! added in any order.
//!
//! # Example
//!
//! ```rust
//! use fuelprice_sdk::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("stations s")
//!     .where_eq("s.id", 42i64)
//!     .order_by(&["s.id ASC"])
//!     .limit(10)
//!     .build();
//! ```

use chrono::{DateTime, Utc};
use duckdb::types::{TimeUnit, ToSqlOutput, Value};

// ---------------------------------------------------------------------------
// SqlValue
// ---------------------------------------------------------------------------

/// A single bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl duckdb::ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            SqlValue::Bool(b) => Value::Boolean(*b),
            SqlValue::Int(n) => Value::BigInt(*n),
            SqlValue::Real(f) => Value::Double(*f),
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Timestamp(ts) => Value::Timestamp(TimeUnit::Microsecond, ts.timestamp_micros()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

// ---------------------------------------------------------------------------
// SqlBuilder
// ---------------------------------------------------------------------------

/// Builds parameterized SQL queries safely.
///
/// All user-supplied values go through DuckDB's parameter binding (`?` placeholders),
/// never through string interpolation. Methods return `&mut Self` for chaining.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    joins: Vec<String>,
    join_params: Vec<SqlValue>,
    where_clauses: Vec<String>,
    where_params: Vec<SqlValue>,
    order_by_cols: Vec<String>,
    order_params: Vec<SqlValue>,
    limit_val: Option<usize>,
    offset_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table or view.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            joins: Vec::new(),
            join_params: Vec::new(),
            where_clauses: Vec::new(),
            where_params: Vec::new(),
            order_by_cols: Vec::new(),
            order_params: Vec::new(),
            limit_val: None,
            offset_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a JOIN clause.
    ///
    /// The clause should be a full JOIN expression, e.g.
    /// `"JOIN station_prices sp ON sp.price_id = p.id"`.
    pub fn join(&mut self, clause: &str) -> &mut Self {
        self.joins.push(clause.to_string());
        self
    }

    /// Add a JOIN clause whose ON condition carries `?` placeholders.
    pub fn join_with(&mut self, clause: &str, params: &[SqlValue]) -> &mut Self {
        self.joins.push(clause.to_string());
        self.join_params.extend_from_slice(params);
        self
    }

    /// Add a WHERE condition with `?` placeholders for each param.
    ///
    /// The caller provides a condition using `?` for each parameter value.
    /// Parameters are appended in order.
    pub fn where_clause(&mut self, condition: &str, params: &[SqlValue]) -> &mut Self {
        self.where_clauses.push(condition.to_string());
        self.where_params.extend_from_slice(params);
        self
    }

    /// Add an IN condition with parameterized values.
    ///
    /// Empty values list produces `FALSE`.
    pub fn where_in(&mut self, column: &str, values: &[SqlValue]) -> &mut Self {
        if values.is_empty() {
            self.where_clauses.push("FALSE".to_string());
            return self;
        }
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        self.where_clauses
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
        self.where_params.extend_from_slice(values);
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.where_params.push(value.into());
        self
    }

    /// Add a greater-than-or-equal condition: `{column} >= ?`.
    pub fn where_gte(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.where_clauses.push(format!("{} >= ?", column));
        self.where_params.push(value.into());
        self
    }

    /// Add OR-combined conditions.
    ///
    /// Each condition is a `(sql_fragment, param_value)` tuple where the fragment
    /// uses `?` as a placeholder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fuelprice_sdk::{SqlBuilder, SqlValue};
    /// let mut builder = SqlBuilder::new("current_prices");
    /// builder.where_or(&[
    ///     ("gas_name = ?", SqlValue::from("Gazole")),
    ///     ("gas_name = ?", SqlValue::from("SP98")),
    /// ]);
    /// // -> WHERE (gas_name = ? OR gas_name = ?)
    /// ```
    pub fn where_or(&mut self, conditions: &[(&str, SqlValue)]) -> &mut Self {
        if conditions.is_empty() {
            return self;
        }
        let mut or_parts = Vec::with_capacity(conditions.len());
        for (cond, param) in conditions {
            or_parts.push(cond.to_string());
            self.where_params.push(param.clone());
        }
        self.where_clauses
            .push(format!("({})", or_parts.join(" OR ")));
        self
    }

    /// Add ORDER BY clauses (e.g. `"s.id ASC"`, `"g0.price DESC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Add an ORDER BY expression that carries `?` placeholders.
    pub fn order_by_with(&mut self, clause: &str, params: &[SqlValue]) -> &mut Self {
        self.order_by_cols.push(clause.to_string());
        self.order_params.extend_from_slice(params);
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Set the number of rows to skip before returning results.
    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    ///
    /// Returns a tuple of `(sql_string, params_list)` ready for execution.
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let cols = self.select_cols.join(", ");
        let mut parts = vec![
            format!("SELECT {}", cols),
            format!("FROM {}", self.from_table),
        ];

        for j in &self.joins {
            parts.push(j.clone());
        }

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        if let Some(n) = self.offset_val {
            parts.push(format!("OFFSET {}", n));
        }

        let mut params = Vec::with_capacity(
            self.join_params.len() + self.where_params.len() + self.order_params.len(),
        );
        params.extend_from_slice(&self.join_params);
        params.extend_from_slice(&self.where_params);
        params.extend_from_slice(&self.order_params);

        (parts.join("\n"), params)
    }
}
