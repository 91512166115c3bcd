use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::period::Period;
use super::price::Gas;

// ---------------------------------------------------------------------------
// GasEvolution — Unrounded evolution of one gas at one station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasEvolution {
    pub gas_name: Gas,
    /// Signed percentage change from the oldest in-window price.
    pub evolution: f64,
}

// ---------------------------------------------------------------------------
// StationEvolution — Every gas evolution computed for one station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEvolution {
    pub station_id: i64,
    pub evolution: Vec<GasEvolution>,
}

// ---------------------------------------------------------------------------
// TrendRecord — Memoized evolution list keyed by (period, station)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub period: Period,
    pub station_id: i64,
    /// `None` when the record exists but was never populated.
    pub evolution: Option<Vec<GasEvolution>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// PriceTrendsResult — Evolution per gas averaged over the targeted stations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageEvolution {
    pub gas_name: Gas,
    /// Percentage with exactly two decimals, e.g. `"20.00"`.
    pub evolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrendsResult {
    pub period: Period,
    pub evolutions: Vec<AverageEvolution>,
}
