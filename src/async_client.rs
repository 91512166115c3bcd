//! Async wrapper around [`FuelPriceSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Price trends fan out one blocking task per station, each on its own
//! DuckDB connection, and join them all before averaging. Trend record
//! writes from every task and every call go through one shared lock, so
//! overlapping recomputations of the same station both succeed and the
//! last writer's list is kept.
//!
//! # Example
//!
//! ```no_run
//! use fuelprice_sdk::AsyncFuelPriceSdk;
//! use fuelprice_sdk::models::{Period, PriceTrendsParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncFuelPriceSdk::builder().build().await.unwrap();
//!
//!     let trends = sdk
//!         .price_trends(None, PriceTrendsParams::new(Period::LastWeek), false)
//!         .await
//!         .unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::analytics;
use crate::error::{FuelPriceError, Result};
use crate::models::{PriceTrendsParams, PriceTrendsResult};
use crate::queries::trends::TrendQuery;
use crate::sql_builder::SqlValue;
use crate::FuelPriceSdk;

// ---------------------------------------------------------------------------
// AsyncFuelPriceSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncFuelPriceSdk`] instance.
#[derive(Default)]
pub struct AsyncFuelPriceSdkBuilder {
    database_path: Option<PathBuf>,
    in_memory: bool,
}

impl AsyncFuelPriceSdkBuilder {
    /// Use an on-disk database at `path`.
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Use an ephemeral in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self.database_path = None;
        self
    }

    /// Build the async SDK, opening the database on the blocking pool.
    pub async fn build(self) -> Result<AsyncFuelPriceSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = FuelPriceSdk::builder();
            if let Some(path) = self.database_path {
                builder = builder.database_path(path);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            let sdk = builder.build()?;
            Ok(AsyncFuelPriceSdk {
                trend_writes: sdk.trend_write_lock(),
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| FuelPriceError::Runtime(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncFuelPriceSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`FuelPriceSdk`].
///
/// Operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`FuelPriceSdk`] is
/// protected by a [`Mutex`]; trend fan-out uses cloned connections instead
/// so stations are computed in parallel, sharing the SDK's trend write lock.
pub struct AsyncFuelPriceSdk {
    inner: Arc<Mutex<FuelPriceSdk>>,
    trend_writes: Arc<Mutex<()>>,
}

impl AsyncFuelPriceSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncFuelPriceSdkBuilder {
        AsyncFuelPriceSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&FuelPriceSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&FuelPriceSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| FuelPriceError::Runtime("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| FuelPriceError::Runtime(format!("Task join error: {e}")))?
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |s| s.sql(&query, &params)).await
    }

    /// Price evolution per gas for one station (`Some(id)`) or for every
    /// station matching the area and gases of `params` (`None`).
    ///
    /// Each station is computed in its own blocking task. The result is only
    /// returned once every task has finished; the first failure fails the call.
    pub async fn price_trends(
        &self,
        station_id: Option<i64>,
        params: PriceTrendsParams,
        force: bool,
    ) -> Result<PriceTrendsResult> {
        let now = Utc::now();
        let lookup = params.clone();
        let targets = self
            .run(move |s| {
                TrendQuery::new(s.connection())
                    .targets(station_id, &lookup)?
                    .into_iter()
                    .map(|station| -> Result<_> {
                        Ok((station, s.connection().try_clone()?))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .await?;

        let period = params.period;
        let handles: Vec<_> = targets
            .into_iter()
            .map(|(station, conn)| {
                let writes = self.trend_writes.clone();
                tokio::task::spawn_blocking(move || {
                    TrendQuery::new(&conn)
                        .with_write_lock(&writes)
                        .station_evolution(&station, period, force, now)
                })
            })
            .collect();

        let mut per_station = Vec::with_capacity(handles.len());
        for handle in handles {
            let evolution = handle
                .await
                .map_err(|e| FuelPriceError::Runtime(format!("Task join error: {e}")))??;
            per_station.push(evolution);
        }

        Ok(analytics::average_evolutions(
            period,
            &per_station,
            &params.gas_names,
        ))
    }
}
