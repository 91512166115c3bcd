//! Great-circle distance, in Rust and as a DuckDB expression.
//!
//! Both forms use the same haversine formula and earth radius so that a
//! distance checked in Rust agrees with the one the store filtered on.

use crate::config::EARTH_RADIUS_METERS;
use crate::models::Coordinate;
use crate::sql_builder::SqlValue;

/// Haversine distance between two points, in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.min(1.0).sqrt().asin()
}

/// SQL expression for the distance in meters between the row position held in
/// `lon_col`/`lat_col` and `center`.
///
/// Returns the expression and its parameters, in placeholder order.
pub fn distance_sql(lon_col: &str, lat_col: &str, center: Coordinate) -> (String, Vec<SqlValue>) {
    let expr = format!(
        "(2 * {radius} * asin(sqrt(least(1.0, \
         pow(sin(radians({lat} - ?) / 2), 2) \
         + cos(radians(?)) * cos(radians({lat})) * pow(sin(radians({lon} - ?) / 2), 2)))))",
        radius = EARTH_RADIUS_METERS,
        lat = lat_col,
        lon = lon_col,
    );
    let params = vec![
        SqlValue::Real(center.latitude),
        SqlValue::Real(center.latitude),
        SqlValue::Real(center.longitude),
    ];
    (expr, params)
}
