use std::path::PathBuf;

pub const DATABASE_FILE: &str = "fuelprice.duckdb";

pub const STATIONS_TABLE: &str = "stations";
pub const PRICES_TABLE: &str = "prices";
pub const STATION_PRICES_TABLE: &str = "station_prices";
pub const SCHEDULES_TABLE: &str = "schedules";
pub const CURRENT_PRICES_TABLE: &str = "current_prices";
pub const PRICE_TRENDS_TABLE: &str = "price_trends";

/// Mean earth radius used by every distance computation, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Decimal places kept on per-gas price averages.
pub const AVERAGE_PRECISION: u32 = 3;

/// Decimal places kept on cross-station evolution averages.
pub const EVOLUTION_PRECISION: u32 = 2;

pub fn default_data_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("fuelprice-sdk")
    } else {
        PathBuf::from(".fuelprice-sdk")
    }
}

pub fn default_database_path() -> PathBuf {
    default_data_dir().join(DATABASE_FILE)
}
