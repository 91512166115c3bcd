//! Write side of the station store, used by the feed importer.
//!
//! A refresh replaces a station wholesale: its row, attached price set,
//! schedules and `current_prices` index entries are rewritten, while every
//! supplied price is appended to the `prices` history.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{
    CURRENT_PRICES_TABLE, PRICES_TABLE, SCHEDULES_TABLE, STATIONS_TABLE, STATION_PRICES_TABLE,
};
use crate::connection::Connection;
use crate::error::{FuelPriceError, Result};
use crate::grouping::group_by;
use crate::models::{Coordinate, NewPrice, Schedule};
use crate::sql_builder::SqlValue;

// ---------------------------------------------------------------------------
// StationRecord — One station as delivered by a feed refresh
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub position: Coordinate,
    #[serde(default)]
    pub prices: Vec<NewPrice>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

// ---------------------------------------------------------------------------
// StationStore
// ---------------------------------------------------------------------------

pub struct StationStore<'a> {
    conn: &'a Connection,
}

impl<'a> StationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Replace a station with `record` and return the ids of its new prices.
    ///
    /// Runs in one transaction; on error nothing is written.
    pub fn upsert_station(&self, record: &StationRecord) -> Result<Vec<i64>> {
        record.position.validate()?;
        for price in &record.prices {
            validate_price(price)?;
        }

        let price_ids = self.conn.in_transaction(|conn| {
            let id = SqlValue::Int(record.id);
            for table in [
                STATIONS_TABLE,
                STATION_PRICES_TABLE,
                SCHEDULES_TABLE,
                CURRENT_PRICES_TABLE,
            ] {
                let key = if table == STATIONS_TABLE { "id" } else { "station_id" };
                conn.execute_statement(
                    &format!("DELETE FROM {} WHERE {} = ?", table, key),
                    std::slice::from_ref(&id),
                )?;
            }

            conn.execute_statement(
                &format!(
                    "INSERT INTO {} (id, name, address, longitude, latitude) VALUES (?, ?, ?, ?, ?)",
                    STATIONS_TABLE
                ),
                &[
                    id.clone(),
                    SqlValue::from(record.name.as_str()),
                    SqlValue::from(record.address.as_str()),
                    SqlValue::Real(record.position.longitude),
                    SqlValue::Real(record.position.latitude),
                ],
            )?;

            let mut price_ids = Vec::with_capacity(record.prices.len());
            for price in &record.prices {
                let price_id = insert_price(conn, record.id, price)?;
                conn.execute_statement(
                    &format!(
                        "INSERT INTO {} (station_id, price_id) VALUES (?, ?)",
                        STATION_PRICES_TABLE
                    ),
                    &[id.clone(), SqlValue::Int(price_id)],
                )?;
                price_ids.push(price_id);
            }

            for (gas, group) in group_by(record.prices.iter(), |p| p.gas) {
                let Some(latest) = group
                    .into_iter()
                    .reduce(|a, b| if b.last_update > a.last_update { b } else { a })
                else {
                    continue;
                };
                conn.execute_statement(
                    &format!(
                        "INSERT INTO {} (station_id, gas_name, price) VALUES (?, ?, ?)",
                        CURRENT_PRICES_TABLE
                    ),
                    &[id.clone(), SqlValue::from(gas.name()), SqlValue::Real(latest.price)],
                )?;
            }

            for schedule in &record.schedules {
                conn.execute_statement(
                    &format!(
                        "INSERT INTO {} (station_id, schedule_id, day, open, opening, closing) \
                         VALUES (?, ?, ?, ?, ?, ?)",
                        SCHEDULES_TABLE
                    ),
                    &[
                        id.clone(),
                        SqlValue::from(schedule.schedule_id),
                        SqlValue::from(schedule.day.as_str()),
                        SqlValue::Bool(schedule.open),
                        SqlValue::from(schedule.opening.as_str()),
                        SqlValue::from(schedule.closing.as_str()),
                    ],
                )?;
            }

            Ok(price_ids)
        })?;

        info!(
            station_id = record.id,
            prices = price_ids.len(),
            schedules = record.schedules.len(),
            "station refreshed"
        );
        Ok(price_ids)
    }

    /// Append a historical price for a station without attaching it.
    pub fn record_price(&self, station_id: i64, price: &NewPrice) -> Result<i64> {
        validate_price(price)?;
        insert_price(self.conn, station_id, price)
    }
}

fn validate_price(price: &NewPrice) -> Result<()> {
    if !price.price.is_finite() {
        return Err(FuelPriceError::InvalidArgument(format!(
            "price of {} is not a finite number",
            price.gas
        )));
    }
    Ok(())
}

fn insert_price(conn: &Connection, station_id: i64, price: &NewPrice) -> Result<i64> {
    let sql = format!(
        "INSERT INTO {} (station_id, gas_id, gas_name, price, last_update) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
        PRICES_TABLE
    );
    conn.execute_scalar(
        &sql,
        &[
            SqlValue::Int(station_id),
            SqlValue::from(price.gas.id()),
            SqlValue::from(price.gas.name()),
            SqlValue::Real(price.price),
            SqlValue::Timestamp(price.last_update),
        ],
    )?
    .and_then(|v| v.as_i64())
    .ok_or_else(|| FuelPriceError::Runtime("price insert returned no id".into()))
}
