use serde::{Deserialize, Serialize};

use super::price::Price;
use crate::error::{FuelPriceError, Result};
use crate::grouping::group_by;

// ---------------------------------------------------------------------------
// Coordinate — Longitude/latitude pair in degrees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        let coordinate = Self {
            longitude,
            latitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Parse a coordinate from raw query-string values.
    pub fn parse(longitude: &str, latitude: &str) -> Result<Self> {
        let lon = parse_number("longitude", longitude)?;
        let lat = parse_number("latitude", latitude)?;
        Self::new(lon, lat)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(FuelPriceError::InvalidArgument(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(FuelPriceError::InvalidArgument(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// Parse a search radius in meters from a raw query-string value.
pub fn parse_radius(raw: &str) -> Result<f64> {
    let radius = parse_number("radius", raw)?;
    if radius < 0.0 {
        return Err(FuelPriceError::InvalidArgument(format!(
            "radius must not be negative: {radius}"
        )));
    }
    Ok(radius)
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FuelPriceError::InvalidArgument(format!("{field} is not a number: {raw:?}")))
}

// ---------------------------------------------------------------------------
// Schedule — Opening hours for one day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: i32,
    pub day: String,
    pub open: bool,
    pub opening: String,
    pub closing: String,
}

// ---------------------------------------------------------------------------
// Station — A fuel-selling point (projection-dependent fields are optional)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<Price>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<Schedule>>,
}

impl Station {
    /// The most recently timestamped price of each gas in the attached collection.
    ///
    /// Gases appear in the order they are first seen in `prices`. Returns an
    /// empty list when prices were not loaded.
    pub fn current_prices(&self) -> Vec<&Price> {
        let attached = self.prices.as_deref().unwrap_or_default();
        group_by(attached.iter(), |p| p.gas_name)
            .into_iter()
            .filter_map(|(_, group)| {
                group.into_iter().reduce(|latest, candidate| {
                    if candidate.last_update > latest.last_update {
                        candidate
                    } else {
                        latest
                    }
                })
            })
            .collect()
    }
}
