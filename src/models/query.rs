use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::period::Period;
use super::price::Gas;
use super::station::Coordinate;
use crate::error::{FuelPriceError, Result};

// ---------------------------------------------------------------------------
// Direction — Sort direction, serialized as `asc` / `desc`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `+1` for ascending, `-1` for descending.
    pub fn sign(self) -> i8 {
        match self {
            Direction::Asc => 1,
            Direction::Desc => -1,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = FuelPriceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "1" => Ok(Direction::Asc),
            "desc" | "-1" => Ok(Direction::Desc),
            _ => Err(FuelPriceError::InvalidArgument(format!(
                "unknown order direction: {s:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Projection — Which station fields and relations to return
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationField {
    Id,
    Name,
    Address,
    Position,
    Prices,
    Schedules,
}

impl StationField {
    pub const ALL: [StationField; 6] = [
        StationField::Id,
        StationField::Name,
        StationField::Address,
        StationField::Position,
        StationField::Prices,
        StationField::Schedules,
    ];
}

impl FromStr for StationField {
    type Err = FuelPriceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "id" => Ok(StationField::Id),
            "name" => Ok(StationField::Name),
            "address" => Ok(StationField::Address),
            "position" => Ok(StationField::Position),
            "prices" => Ok(StationField::Prices),
            "schedules" => Ok(StationField::Schedules),
            other => Err(FuelPriceError::InvalidArgument(format!(
                "unknown station field: {other:?}"
            ))),
        }
    }
}

/// Set of station fields to return. `id` is always included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    fields: Vec<StationField>,
}

impl Projection {
    /// Every field and relation.
    pub fn all() -> Self {
        Self {
            fields: StationField::ALL.to_vec(),
        }
    }

    pub fn of(fields: &[StationField]) -> Self {
        let mut out = Self { fields: Vec::new() };
        for field in fields {
            out.insert(*field);
        }
        out
    }

    /// Parse a projection from column names such as `["id", "name", "prices"]`.
    pub fn parse(columns: &[&str]) -> Result<Self> {
        let fields = columns
            .iter()
            .map(|c| c.parse::<StationField>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::of(&fields))
    }

    pub fn insert(&mut self, field: StationField) {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
    }

    pub fn includes(&self, field: StationField) -> bool {
        field == StationField::Id || self.fields.contains(&field)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Stations within `radius` meters of `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaFilter {
    pub center: Coordinate,
    pub radius: f64,
}

impl AreaFilter {
    pub fn new(center: Coordinate, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn validate(&self) -> Result<()> {
        self.center.validate()?;
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(FuelPriceError::InvalidArgument(format!(
                "radius must be a non-negative number: {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Station filters. Distinct filters combine with AND; the gases inside
/// `gas_available` combine with OR. Empty filters are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationFilters {
    #[serde(default)]
    pub gas_available: Vec<Gas>,
    #[serde(default)]
    pub area: Option<AreaFilter>,
}

// ---------------------------------------------------------------------------
// OrderDirective — One sort key; directives refine each other left to right
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum OrderDirective {
    Id { direction: Direction },
    Distance { point: Coordinate },
    GasPrice { gas: Gas, direction: Direction },
}

// ---------------------------------------------------------------------------
// ListStationsParams — Filters, orders, projection and paging for a station query
// ---------------------------------------------------------------------------

/// Parameters for station listing and price averages.
///
/// All fields are optional. When `None` or empty, the corresponding stage is skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListStationsParams {
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default)]
    pub filters: StationFilters,
    #[serde(default)]
    pub orders: Vec<OrderDirective>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl ListStationsParams {
    /// Check every coordinate and radius before the query reaches the store.
    pub fn validate(&self) -> Result<()> {
        if let Some(area) = &self.filters.area {
            area.validate()?;
        }
        for order in &self.orders {
            if let OrderDirective::Distance { point } = order {
                point.validate()?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PriceTrendsParams — Trend query over an area or a gas selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrendsParams {
    pub period: Period,
    /// Restricts both the stations considered and the gases reported. Empty means all.
    #[serde(default)]
    pub gas_names: Vec<Gas>,
    #[serde(default)]
    pub position: Option<Coordinate>,
    #[serde(default)]
    pub radius: Option<f64>,
}

impl PriceTrendsParams {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            gas_names: Vec::new(),
            position: None,
            radius: None,
        }
    }

    /// The area restriction; only set when both position and radius are given.
    pub fn area(&self) -> Option<AreaFilter> {
        match (self.position, self.radius) {
            (Some(center), Some(radius)) => Some(AreaFilter::new(center, radius)),
            _ => None,
        }
    }

    /// Station filters equivalent to this trend query.
    pub fn station_filters(&self) -> StationFilters {
        StationFilters {
            gas_available: self.gas_names.clone(),
            area: self.area(),
        }
    }
}
