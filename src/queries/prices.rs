//! Price queries against the append-only `prices` table.

use chrono::{DateTime, Utc};

use crate::analytics;
use crate::config::{PRICES_TABLE, STATION_PRICES_TABLE};
use crate::error::{FuelPriceError, Result};
use crate::models::{Period, Price, PriceHistory};
use crate::queries::stations::StationQuery;
use crate::sql_builder::{SqlBuilder, SqlValue};

// ---------------------------------------------------------------------------
// PriceWindow
// ---------------------------------------------------------------------------

/// Selection of a station's recorded prices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceWindow {
    /// Inclusive lower bound on `last_update`; `None` for no bound.
    pub since: Option<DateTime<Utc>>,
    /// Leave out the prices currently attached to the station.
    pub exclude_attached: bool,
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for recorded station prices.
pub struct PriceQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// Prices recorded for a station inside `window`, oldest first.
    pub fn for_station(&self, station_id: i64, window: PriceWindow) -> Result<Vec<Price>> {
        let mut qb = SqlBuilder::new(&format!("{} p", PRICES_TABLE));
        qb.where_eq("p.station_id", station_id);

        if let Some(since) = window.since {
            qb.where_gte("p.last_update", since);
        }

        if window.exclude_attached {
            qb.where_clause(
                &format!(
                    "p.id NOT IN (SELECT price_id FROM {} WHERE station_id = ?)",
                    STATION_PRICES_TABLE
                ),
                &[SqlValue::Int(station_id)],
            );
        }

        qb.order_by(&["p.last_update ASC", "p.id ASC"]);

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// Per-gas price history of a station over `period`.
    pub fn history(&self, station_id: i64, period: Period) -> Result<Vec<PriceHistory>> {
        self.history_at(station_id, period, Utc::now())
    }

    /// [`history`](Self::history) with the window resolved against `now`.
    ///
    /// Fails with `NotFound` when the station does not exist.
    pub fn history_at(
        &self,
        station_id: i64,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<Vec<PriceHistory>> {
        if !StationQuery::new(self.conn).exists(station_id)? {
            return Err(FuelPriceError::NotFound(format!("station {station_id}")));
        }

        let prices = self.for_station(
            station_id,
            PriceWindow {
                since: period.min_timestamp(now),
                exclude_attached: false,
            },
        )?;
        Ok(analytics::build_history(&prices))
    }
}
