//! Pure aggregations over station and price data already read from the store.

pub mod average;
pub mod evolution;
pub mod history;

pub use average::price_averages;
pub use evolution::{average_evolutions, station_evolution};
pub use history::{build_history, dedup_daily};

/// Round `value` to `decimals` places, half away from zero.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
