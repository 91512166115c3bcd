//! Compiles [`ListStationsParams`] into a parameterized station query.
//!
//! Filters and orders are translated independently, then composed onto one
//! [`SqlBuilder`] over `stations s`:
//!
//! - gas availability becomes an OR of `EXISTS` checks on the `current_prices` index;
//! - an area becomes a haversine distance bound, which also implies nearest-first
//!   ordering unless an explicit distance order is given;
//! - a gas-price order inner-joins the index row for that gas, so stations without
//!   a numeric price for it are dropped instead of sorted with an undefined key;
//! - `s.id ASC` is appended whenever no id order was requested, making the order total.

use crate::config::{CURRENT_PRICES_TABLE, STATIONS_TABLE};
use crate::error::Result;
use crate::geo::distance_sql;
use crate::models::{ListStationsParams, OrderDirective, StationFilters};
use crate::sql_builder::{SqlBuilder, SqlValue};

/// Columns read for every station row; relations are loaded separately.
pub const STATION_COLUMNS: [&str; 5] = [
    "s.id",
    "s.name",
    "s.address",
    "s.longitude",
    "s.latitude",
];

/// Validate `params` and compile them into a station query.
pub fn compile(params: &ListStationsParams) -> Result<SqlBuilder> {
    params.validate()?;

    let mut qb = SqlBuilder::new(&format!("{} s", STATIONS_TABLE));
    qb.select(&STATION_COLUMNS);

    apply_filters(&mut qb, &params.filters);
    apply_orders(&mut qb, &params.orders, &params.filters);

    if let Some(limit) = params.limit {
        qb.limit(limit);
    }
    if let Some(offset) = params.offset.filter(|o| *o > 0) {
        qb.offset(offset);
    }

    Ok(qb)
}

/// Narrow the station query by gas availability and area.
pub fn apply_filters(qb: &mut SqlBuilder, filters: &StationFilters) {
    if !filters.gas_available.is_empty() {
        let exists_check = format!(
            "EXISTS (SELECT 1 FROM {} cp WHERE cp.station_id = s.id AND cp.gas_name = ?)",
            CURRENT_PRICES_TABLE
        );
        let conditions: Vec<(&str, SqlValue)> = filters
            .gas_available
            .iter()
            .map(|gas| (exists_check.as_str(), SqlValue::from(gas.name())))
            .collect();
        qb.where_or(&conditions);
    }

    if let Some(area) = &filters.area {
        let (distance, mut params) = distance_sql("s.longitude", "s.latitude", area.center);
        params.push(SqlValue::Real(area.radius));
        qb.where_clause(&format!("{} <= ?", distance), &params);
    }
}

/// Apply the order directives left to right, then the implicit keys.
pub fn apply_orders(qb: &mut SqlBuilder, orders: &[OrderDirective], filters: &StationFilters) {
    let mut has_id = false;
    let mut has_distance = false;

    for (i, order) in orders.iter().enumerate() {
        match order {
            OrderDirective::Id { direction } => {
                has_id = true;
                qb.order_by(&[&format!("s.id {}", direction.sql())]);
            }
            OrderDirective::Distance { point } => {
                has_distance = true;
                let (distance, params) = distance_sql("s.longitude", "s.latitude", *point);
                qb.order_by_with(&format!("{} ASC", distance), &params);
            }
            OrderDirective::GasPrice { gas, direction } => {
                let alias = format!("g{}", i);
                qb.join_with(
                    &format!(
                        "JOIN {table} {a} ON {a}.station_id = s.id AND {a}.gas_name = ? AND {a}.price IS NOT NULL",
                        table = CURRENT_PRICES_TABLE,
                        a = alias
                    ),
                    &[SqlValue::from(gas.name())],
                );
                qb.order_by(&[&format!("{}.price {}", alias, direction.sql())]);
            }
        }
    }

    if let Some(area) = filters.area.filter(|_| !has_distance) {
        let (distance, params) = distance_sql("s.longitude", "s.latitude", area.center);
        qb.order_by_with(&format!("{} ASC", distance), &params);
    }

    if !has_id {
        qb.order_by(&["s.id ASC"]);
    }
}
