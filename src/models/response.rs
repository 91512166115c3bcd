use serde::{Deserialize, Serialize};

use super::price::Gas;
use super::station::Station;

// ---------------------------------------------------------------------------
// StationListResponse — Paginated station listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub offset: usize,
    pub nb_items: usize,
    pub data: Vec<Station>,
}

// ---------------------------------------------------------------------------
// GasPriceAverage — Mean current price of one gas over a station set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasPriceAverage {
    pub gas_name: Gas,
    pub price_average: f64,
}

// ---------------------------------------------------------------------------
// PriceHistory — Per-gas price series ordered by weekday
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPrice {
    /// Weekday ordinal of the observation, Sunday = 0 through Saturday = 6.
    pub date: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub gas: Gas,
    pub data: Vec<PeriodPrice>,
}
