//! Price trend engine: per-station evolutions memoized in the trend cache,
//! averaged per gas across the targeted stations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::analytics;
use crate::cache::TrendCache;
use crate::error::{FuelPriceError, Result};
use crate::models::{
    ListStationsParams, Period, PriceTrendsParams, PriceTrendsResult, Projection, Station,
    StationEvolution, StationField,
};
use crate::queries::prices::{PriceQuery, PriceWindow};
use crate::queries::stations::StationQuery;

/// Query interface for price evolutions.
pub struct TrendQuery<'a> {
    conn: &'a crate::connection::Connection,
    writes: Option<&'a Mutex<()>>,
}

impl<'a> TrendQuery<'a> {
    /// Create a new `TrendQuery` bound to the given connection.
    pub fn new(conn: &'a crate::connection::Connection) -> Self {
        Self { conn, writes: None }
    }

    /// Hold `lock` around every trend record write.
    ///
    /// Queries running on separate connections to the same database must
    /// share one lock: DuckDB aborts the later of two overlapping commits on
    /// the same `(period, station)` key instead of replacing the row.
    pub fn with_write_lock(mut self, lock: &'a Mutex<()>) -> Self {
        self.writes = Some(lock);
        self
    }

    /// Evolution per gas at one station.
    ///
    /// `force` recomputes and overwrites the cached record even when present.
    pub fn for_station(
        &self,
        station_id: i64,
        params: &PriceTrendsParams,
        force: bool,
    ) -> Result<PriceTrendsResult> {
        self.compute(Some(station_id), params, force, Utc::now())
    }

    /// Evolution per gas averaged over every station matching the area and
    /// gas selection of `params`.
    pub fn for_area(&self, params: &PriceTrendsParams, force: bool) -> Result<PriceTrendsResult> {
        self.compute(None, params, force, Utc::now())
    }

    /// Shared entry point with the window resolved against `now`.
    pub fn compute(
        &self,
        station_id: Option<i64>,
        params: &PriceTrendsParams,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<PriceTrendsResult> {
        let stations = self.targets(station_id, params)?;
        let per_station = stations
            .iter()
            .map(|station| self.station_evolution(station, params.period, force, now))
            .collect::<Result<Vec<_>>>()?;
        Ok(analytics::average_evolutions(
            params.period,
            &per_station,
            &params.gas_names,
        ))
    }

    /// Resolve the stations a trend query runs over, with prices loaded.
    ///
    /// An explicit id that does not exist is `NotFound`.
    pub fn targets(&self, station_id: Option<i64>, params: &PriceTrendsParams) -> Result<Vec<Station>> {
        let stations = StationQuery::new(self.conn);
        match station_id {
            Some(id) => stations
                .get(id)?
                .map(|s| vec![s])
                .ok_or_else(|| FuelPriceError::NotFound(format!("station {id}"))),
            None => stations.search(&ListStationsParams {
                projection: Some(Projection::of(&[StationField::Prices])),
                filters: params.station_filters(),
                ..ListStationsParams::default()
            }),
        }
    }

    /// Evolution of every gas at `station`, served from the trend cache unless
    /// the record is missing, unpopulated or `force` is set.
    pub fn station_evolution(
        &self,
        station: &Station,
        period: Period,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<StationEvolution> {
        let cache = TrendCache::new(self.conn);

        if !force {
            if let Some(evolution) = cache.find(period, station.id)?.and_then(|r| r.evolution) {
                debug!(station_id = station.id, %period, "trend cache hit");
                return Ok(StationEvolution {
                    station_id: station.id,
                    evolution,
                });
            }
        }

        let historical = PriceQuery::new(self.conn).for_station(
            station.id,
            PriceWindow {
                since: period.min_timestamp(now),
                exclude_attached: true,
            },
        )?;
        let current = station.prices.as_deref().unwrap_or_default();
        let evolution = analytics::station_evolution(current, &historical);

        {
            let _guard = self
                .writes
                .map(|lock| lock.lock())
                .transpose()
                .map_err(|_| FuelPriceError::Runtime("trend write lock poisoned".into()))?;
            cache.upsert(period, station.id, &evolution, now)?;
        }
        info!(
            station_id = station.id,
            %period,
            gases = evolution.len(),
            "trend recomputed"
        );

        Ok(StationEvolution {
            station_id: station.id,
            evolution,
        })
    }
}
