use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FuelPriceError, Result};

// ---------------------------------------------------------------------------
// Gas — Fuel type identifier, numbered as in the open-data feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gas {
    #[serde(rename = "Gazole")]
    Gazole,
    #[serde(rename = "SP95")]
    Sp95,
    #[serde(rename = "E85")]
    E85,
    #[serde(rename = "GPLc")]
    Gplc,
    #[serde(rename = "E10")]
    E10,
    #[serde(rename = "SP98")]
    Sp98,
}

impl Gas {
    pub const ALL: [Gas; 6] = [Gas::Gazole, Gas::Sp95, Gas::E85, Gas::Gplc, Gas::E10, Gas::Sp98];

    /// Feed identifier of the gas.
    pub fn id(self) -> i32 {
        match self {
            Gas::Gazole => 1,
            Gas::Sp95 => 2,
            Gas::E85 => 3,
            Gas::Gplc => 4,
            Gas::E10 => 5,
            Gas::Sp98 => 6,
        }
    }

    /// Display name, as stored in the `gas_name` columns.
    pub fn name(self) -> &'static str {
        match self {
            Gas::Gazole => "Gazole",
            Gas::Sp95 => "SP95",
            Gas::E85 => "E85",
            Gas::Gplc => "GPLc",
            Gas::E10 => "E10",
            Gas::Sp98 => "SP98",
        }
    }

    pub fn from_id(id: i32) -> Option<Gas> {
        Gas::ALL.into_iter().find(|g| g.id() == id)
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gas {
    type Err = FuelPriceError;

    /// Parse a gas from its name, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Gas::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FuelPriceError::InvalidArgument(format!("unknown gas: {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Price — One recorded price observation
// ---------------------------------------------------------------------------

/// A price observation. Rows are append-only: every feed refresh records a
/// new `Price` instead of updating an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: i64,
    #[serde(default)]
    pub station_id: Option<i64>,
    pub gas_id: i32,
    pub gas_name: Gas,
    pub price: f64,
    pub last_update: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// NewPrice — A price observation not yet assigned an id
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrice {
    pub gas: Gas,
    pub price: f64,
    pub last_update: DateTime<Utc>,
}

impl NewPrice {
    pub fn new(gas: Gas, price: f64, last_update: DateTime<Utc>) -> Self {
        Self {
            gas,
            price,
            last_update,
        }
    }
}
