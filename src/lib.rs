//! Fuel price SDK for Rust.
//!
//! Queries station and price snapshots of the fuel-price open data held in an
//! embedded DuckDB database: filtered and sorted station listings, average
//! price per gas, price evolution over a period and per-gas price history.
//!
//! # Quick start
//!
//! ```no_run
//! use fuelprice_sdk::FuelPriceSdk;
//! use fuelprice_sdk::models::{Gas, ListStationsParams, Period, PriceTrendsParams};
//!
//! let sdk = FuelPriceSdk::builder().build().unwrap();
//!
//! // Stations selling SP98
//! let mut params = ListStationsParams::default();
//! params.filters.gas_available = vec![Gas::Sp98];
//! let stations = sdk.stations().list(&params).unwrap();
//!
//! // How prices moved over the last month at one station
//! let trends = sdk
//!     .trends()
//!     .for_station(42, &PriceTrendsParams::new(Period::LastMonth), false)
//!     .unwrap();
//! ```

pub mod analytics;
#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod geo;
pub mod grouping;
pub mod models;
pub mod queries;
pub mod sql_builder;
pub mod store;

#[cfg(feature = "async")]
pub use async_client::AsyncFuelPriceSdk;
pub use cache::TrendCache;
pub use connection::Connection;
pub use error::{FuelPriceError, Result};
pub use sql_builder::{SqlBuilder, SqlValue};
pub use store::{StationRecord, StationStore};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// FuelPriceSdkBuilder
// ---------------------------------------------------------------------------

/// Where the DuckDB database lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    InMemory,
    File(PathBuf),
}

/// Builder for configuring and constructing a [`FuelPriceSdk`] instance.
///
/// Use [`FuelPriceSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](FuelPriceSdkBuilder::build) to create the SDK.
#[derive(Default)]
pub struct FuelPriceSdkBuilder {
    storage: Option<Storage>,
}

impl FuelPriceSdkBuilder {
    /// Use an on-disk database at `path`.
    ///
    /// If neither this nor [`in_memory`](Self::in_memory) is called, the
    /// platform-appropriate default location is used (e.g.
    /// `~/.cache/fuelprice-sdk/fuelprice.duckdb` on Linux).
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage = Some(Storage::File(path.as_ref().to_path_buf()));
        self
    }

    /// Use an ephemeral in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.storage = Some(Storage::InMemory);
        self
    }

    /// Build the SDK, opening the database and creating its schema.
    pub fn build(self) -> Result<FuelPriceSdk> {
        let storage = self
            .storage
            .unwrap_or_else(|| Storage::File(config::default_database_path()));
        let conn = match &storage {
            Storage::InMemory => Connection::open_in_memory()?,
            Storage::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Connection::open(path)?
            }
        };
        Ok(FuelPriceSdk {
            conn,
            storage,
            trend_writes: Arc::new(Mutex::new(())),
        })
    }
}

// ---------------------------------------------------------------------------
// FuelPriceSdk
// ---------------------------------------------------------------------------

/// The main entry point for the fuel price SDK.
///
/// Wraps a [`Connection`] and exposes domain-specific query interfaces as
/// lightweight borrowing wrappers.
///
/// Created via [`FuelPriceSdk::builder()`].
pub struct FuelPriceSdk {
    conn: Connection,
    storage: Storage,
    trend_writes: Arc<Mutex<()>>,
}

impl FuelPriceSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> FuelPriceSdkBuilder {
        FuelPriceSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the station query interface (listings, lookups, price averages).
    pub fn stations(&self) -> queries::stations::StationQuery<'_> {
        queries::stations::StationQuery::new(&self.conn)
    }

    /// Access the price query interface (price windows, price history).
    pub fn prices(&self) -> queries::prices::PriceQuery<'_> {
        queries::prices::PriceQuery::new(&self.conn)
    }

    /// Access the price trend interface.
    ///
    /// Per-station evolutions are memoized in the `price_trends` table.
    pub fn trends(&self) -> queries::trends::TrendQuery<'_> {
        queries::trends::TrendQuery::new(&self.conn).with_write_lock(&self.trend_writes)
    }

    /// Access the store write interface used by feed importers.
    pub fn store(&self) -> StationStore<'_> {
        StationStore::new(&self.conn)
    }

    // -- Utility methods ---------------------------------------------------

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Provides escape-hatch access for queries not covered by the
    /// domain-specific interfaces.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    pub fn sql(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Where the database of this SDK lives.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Lock serializing trend record writes across connections cloned from this SDK.
    pub(crate) fn trend_write_lock(&self) -> Arc<Mutex<()>> {
        self.trend_writes.clone()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for FuelPriceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.storage {
            Storage::InMemory => write!(f, "FuelPriceSdk(storage=memory)"),
            Storage::File(path) => write!(f, "FuelPriceSdk(storage={})", path.display()),
        }
    }
}
