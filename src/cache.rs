//! Memoized trend records keyed by `(period, station)`.
//!
//! A record is recomputed only when it is missing or a caller forces it;
//! there is no expiry. Upserts are single `INSERT OR REPLACE` statements.
//! Writers on separate connections must be serialized: DuckDB rejects the
//! second of two overlapping commits on one key. With writes serialized the
//! last writer's list is what remains (see `TrendQuery::with_write_lock`).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::config::PRICE_TRENDS_TABLE;
use crate::connection::Connection;
use crate::error::Result;
use crate::models::{GasEvolution, Period, TrendRecord};
use crate::sql_builder::{SqlBuilder, SqlValue};

#[derive(Debug, Deserialize)]
struct TrendRow {
    period: Period,
    station_id: i64,
    evolution: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Read/write access to the `price_trends` table.
pub struct TrendCache<'a> {
    conn: &'a Connection,
}

impl<'a> TrendCache<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Look up the record for `(period, station_id)`.
    pub fn find(&self, period: Period, station_id: i64) -> Result<Option<TrendRecord>> {
        let (sql, params) = SqlBuilder::new(PRICE_TRENDS_TABLE)
            .select(&["period", "station_id", "evolution", "updated_at"])
            .where_eq("period", period.as_str())
            .where_eq("station_id", station_id)
            .limit(1)
            .build();

        let Some(row) = self
            .conn
            .execute_into::<TrendRow>(&sql, &params)?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let evolution = row
            .evolution
            .as_deref()
            .map(|raw| serde_json::from_str::<Vec<GasEvolution>>(raw))
            .transpose()?;

        Ok(Some(TrendRecord {
            period: row.period,
            station_id: row.station_id,
            evolution,
            updated_at: row.updated_at,
        }))
    }

    /// Insert or overwrite the record for `(period, station_id)`.
    pub fn upsert(
        &self,
        period: Period,
        station_id: i64,
        evolution: &[GasEvolution],
        now: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(evolution)?;
        let sql = format!(
            "INSERT OR REPLACE INTO {} (period, station_id, evolution, updated_at) VALUES (?, ?, ?, ?)",
            PRICE_TRENDS_TABLE
        );
        self.conn.execute_statement(
            &sql,
            &[
                SqlValue::from(period.as_str()),
                SqlValue::Int(station_id),
                SqlValue::Text(payload),
                SqlValue::Timestamp(now),
            ],
        )?;
        debug!(%period, station_id, gases = evolution.len(), "trend record stored");
        Ok(())
    }
}
