//! Station queries: filtered listings, single lookups and price averages.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::compiler;
use crate::analytics;
use crate::config::{PRICES_TABLE, SCHEDULES_TABLE, STATIONS_TABLE, STATION_PRICES_TABLE};
use crate::error::Result;
use crate::grouping::group_by;
use crate::models::{
    Coordinate, GasPriceAverage, ListStationsParams, Price, Projection, Schedule, Station,
    StationField, StationListResponse,
};
use crate::sql_builder::{SqlBuilder, SqlValue};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StationRow {
    id: i64,
    name: Option<String>,
    address: Option<String>,
    longitude: Option<f64>,
    latitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AttachedPriceRow {
    owner_id: i64,
    #[serde(flatten)]
    price: Price,
}

#[derive(Debug, Deserialize)]
struct ScheduleRow {
    station_id: i64,
    #[serde(flatten)]
    schedule: Schedule,
}

// ---------------------------------------------------------------------------
// StationQuery
// ---------------------------------------------------------------------------

/// Query interface for stations backed by the `stations` table and its relations.
pub struct StationQuery<'a> {
    conn: &'a crate::connection::Connection,
}

impl<'a> StationQuery<'a> {
    /// Create a new `StationQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn }
    }

    /// List stations matching `params`, wrapped with pagination metadata.
    pub fn list(&self, params: &ListStationsParams) -> Result<StationListResponse> {
        let data = self.search(params)?;
        Ok(StationListResponse {
            limit: params.limit,
            offset: params.offset.unwrap_or(0),
            nb_items: data.len(),
            data,
        })
    }

    /// Stations matching `params`, shaped by its projection (all fields by default).
    pub fn search(&self, params: &ListStationsParams) -> Result<Vec<Station>> {
        let projection = params.projection.clone().unwrap_or_default();
        let qb = compiler::compile(params)?;
        self.fetch(&qb, &projection)
    }

    /// Retrieve a single station with its prices and schedules.
    pub fn get(&self, id: i64) -> Result<Option<Station>> {
        let mut qb = SqlBuilder::new(&format!("{} s", STATIONS_TABLE));
        qb.select(&compiler::STATION_COLUMNS)
            .where_eq("s.id", id)
            .limit(1);

        Ok(self.fetch(&qb, &Projection::all())?.into_iter().next())
    }

    /// Whether a station with this id exists.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let (sql, params) = SqlBuilder::new(STATIONS_TABLE)
            .select(&["COUNT(*) AS cnt"])
            .where_eq("id", id)
            .build();
        let count = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(count > 0)
    }

    /// Mean current price of each gas over the stations matching `params`.
    ///
    /// Prices are always loaded regardless of the requested projection.
    pub fn price_average(&self, params: &ListStationsParams) -> Result<Vec<GasPriceAverage>> {
        let qb = compiler::compile(params)?;
        let stations = self.fetch(&qb, &Projection::of(&[StationField::Prices]))?;
        Ok(analytics::price_averages(&stations))
    }

    // -- Loading -----------------------------------------------------------

    fn fetch(&self, qb: &SqlBuilder, projection: &Projection) -> Result<Vec<Station>> {
        let (sql, params) = qb.build();
        let rows: Vec<StationRow> = self.conn.execute_into(&sql, &params)?;
        debug!(stations = rows.len(), "station query returned");

        let ids: Vec<SqlValue> = rows.iter().map(|r| SqlValue::Int(r.id)).collect();

        let mut prices = if projection.includes(StationField::Prices) && !ids.is_empty() {
            self.attached_prices(&ids)?
        } else {
            HashMap::new()
        };
        let mut schedules = if projection.includes(StationField::Schedules) && !ids.is_empty() {
            self.schedules(&ids)?
        } else {
            HashMap::new()
        };

        let stations = rows
            .into_iter()
            .map(|row| {
                let position = match (row.longitude, row.latitude) {
                    (Some(longitude), Some(latitude)) => Some(Coordinate {
                        longitude,
                        latitude,
                    }),
                    _ => None,
                };
                Station {
                    id: row.id,
                    name: row.name.filter(|_| projection.includes(StationField::Name)),
                    address: row
                        .address
                        .filter(|_| projection.includes(StationField::Address)),
                    position: position.filter(|_| projection.includes(StationField::Position)),
                    prices: projection
                        .includes(StationField::Prices)
                        .then(|| prices.remove(&row.id).unwrap_or_default()),
                    schedules: projection
                        .includes(StationField::Schedules)
                        .then(|| schedules.remove(&row.id).unwrap_or_default()),
                }
            })
            .collect();

        Ok(stations)
    }

    /// Prices attached to each station, cheapest first.
    fn attached_prices(&self, ids: &[SqlValue]) -> Result<HashMap<i64, Vec<Price>>> {
        let (sql, params) = SqlBuilder::new(&format!("{} sp", STATION_PRICES_TABLE))
            .select(&["sp.station_id AS owner_id", "p.*"])
            .join(&format!("JOIN {} p ON p.id = sp.price_id", PRICES_TABLE))
            .where_in("sp.station_id", ids)
            .order_by(&["p.price ASC", "p.id ASC"])
            .build();

        let rows: Vec<AttachedPriceRow> = self.conn.execute_into(&sql, &params)?;
        Ok(group_by(rows, |r| r.owner_id)
            .into_iter()
            .map(|(id, group)| (id, group.into_iter().map(|r| r.price).collect()))
            .collect())
    }

    /// Schedules of each station, ordered by schedule id.
    fn schedules(&self, ids: &[SqlValue]) -> Result<HashMap<i64, Vec<Schedule>>> {
        let (sql, params) = SqlBuilder::new(SCHEDULES_TABLE)
            .select(&["station_id", "schedule_id", "day", "open", "opening", "closing"])
            .where_in("station_id", ids)
            .order_by(&["schedule_id ASC"])
            .build();

        let rows: Vec<ScheduleRow> = self.conn.execute_into(&sql, &params)?;
        Ok(group_by(rows, |r| r.station_id)
            .into_iter()
            .map(|(id, group)| (id, group.into_iter().map(|r| r.schedule).collect()))
            .collect())
    }
}
