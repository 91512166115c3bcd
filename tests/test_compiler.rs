//! SQL-text tests for the station filter and sort compiler.

use fuelprice_sdk::models::{
    AreaFilter, Coordinate, Direction, Gas, ListStationsParams, OrderDirective, StationFilters,
};
use fuelprice_sdk::queries::compiler::compile;
use fuelprice_sdk::{FuelPriceError, SqlValue};

fn center() -> Coordinate {
    Coordinate::new(7.125102, 43.580418).unwrap()
}

fn center_params() -> Vec<SqlValue> {
    vec![
        SqlValue::Real(43.580418),
        SqlValue::Real(43.580418),
        SqlValue::Real(7.125102),
    ]
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn empty_params_order_by_id_only() {
    let (sql, params) = compile(&ListStationsParams::default()).unwrap().build();
    assert!(sql.starts_with("SELECT s.id, s.name, s.address, s.longitude, s.latitude\nFROM stations s"));
    assert!(!sql.contains("WHERE"));
    assert!(sql.ends_with("ORDER BY s.id ASC"));
    assert!(params.is_empty());
}

#[test]
fn explicit_id_order_replaces_tiebreaker() {
    let params = ListStationsParams {
        orders: vec![OrderDirective::Id {
            direction: Direction::Desc,
        }],
        ..Default::default()
    };
    let (sql, _) = compile(&params).unwrap().build();
    assert!(sql.contains("ORDER BY s.id DESC"));
    assert!(!sql.contains("s.id ASC"));
}

#[test]
fn limit_and_non_zero_offset_are_applied() {
    let params = ListStationsParams {
        limit: Some(2),
        offset: Some(4),
        ..Default::default()
    };
    let (sql, _) = compile(&params).unwrap().build();
    assert!(sql.ends_with("LIMIT 2\nOFFSET 4"));
}

#[test]
fn zero_offset_is_skipped() {
    let params = ListStationsParams {
        offset: Some(0),
        ..Default::default()
    };
    let (sql, _) = compile(&params).unwrap().build();
    assert!(!sql.contains("OFFSET"));
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn gas_filter_is_or_of_exists_checks() {
    let params = ListStationsParams {
        filters: StationFilters {
            gas_available: vec![Gas::Gazole, Gas::E85],
            area: None,
        },
        ..Default::default()
    };
    let (sql, params) = compile(&params).unwrap().build();
    assert_eq!(sql.matches("EXISTS (SELECT 1 FROM current_prices cp").count(), 2);
    assert!(sql.contains(" OR "));
    assert_eq!(params, vec![SqlValue::from("Gazole"), SqlValue::from("E85")]);
}

#[test]
fn area_filter_bounds_distance_and_sorts_nearest_first() {
    let params = ListStationsParams {
        filters: StationFilters {
            gas_available: Vec::new(),
            area: Some(AreaFilter::new(center(), 5000.0)),
        },
        ..Default::default()
    };
    let (sql, params) = compile(&params).unwrap().build();
    assert!(sql.contains("<= ?"));
    assert!(sql.contains("asin"));
    assert!(sql.contains("ASC, s.id ASC"));

    let mut expected = center_params();
    expected.push(SqlValue::Real(5000.0));
    expected.extend(center_params());
    assert_eq!(params, expected);
}

#[test]
fn filters_compose_with_and() {
    let params = ListStationsParams {
        filters: StationFilters {
            gas_available: vec![Gas::Sp98],
            area: Some(AreaFilter::new(center(), 10_000.0)),
        },
        ..Default::default()
    };
    let (sql, _) = compile(&params).unwrap().build();
    assert!(sql.contains(") AND (2 * "));
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[test]
fn gas_price_order_joins_index_and_excludes_missing_prices() {
    let params = ListStationsParams {
        orders: vec![OrderDirective::GasPrice {
            gas: Gas::Sp98,
            direction: Direction::Desc,
        }],
        ..Default::default()
    };
    let (sql, params) = compile(&params).unwrap().build();
    assert!(sql.contains(
        "JOIN current_prices g0 ON g0.station_id = s.id AND g0.gas_name = ? AND g0.price IS NOT NULL"
    ));
    assert!(sql.contains("ORDER BY g0.price DESC, s.id ASC"));
    assert_eq!(params, vec![SqlValue::from("SP98")]);
}

#[test]
fn multiple_orders_refine_left_to_right() {
    let params = ListStationsParams {
        orders: vec![
            OrderDirective::GasPrice {
                gas: Gas::Gazole,
                direction: Direction::Asc,
            },
            OrderDirective::GasPrice {
                gas: Gas::Sp98,
                direction: Direction::Desc,
            },
            OrderDirective::Id {
                direction: Direction::Asc,
            },
        ],
        ..Default::default()
    };
    let (sql, params) = compile(&params).unwrap().build();
    assert!(sql.contains("ORDER BY g0.price ASC, g1.price DESC, s.id ASC"));
    assert_eq!(params, vec![SqlValue::from("Gazole"), SqlValue::from("SP98")]);
}

#[test]
fn explicit_distance_order_suppresses_implicit_one() {
    let elsewhere = Coordinate::new(7.2620, 43.7034).unwrap();
    let params = ListStationsParams {
        filters: StationFilters {
            gas_available: Vec::new(),
            area: Some(AreaFilter::new(center(), 50_000.0)),
        },
        orders: vec![OrderDirective::Distance { point: elsewhere }],
        ..Default::default()
    };
    let (sql, params) = compile(&params).unwrap().build();
    let order_clause = sql.split("ORDER BY").nth(1).unwrap();
    assert_eq!(order_clause.matches("asin").count(), 1);
    // area (3 + radius) then the explicit order point
    assert_eq!(params.len(), 7);
    assert_eq!(params[4], SqlValue::Real(43.7034));
    assert_eq!(params[6], SqlValue::Real(7.2620));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn negative_radius_is_rejected() {
    let params = ListStationsParams {
        filters: StationFilters {
            gas_available: Vec::new(),
            area: Some(AreaFilter::new(center(), -1.0)),
        },
        ..Default::default()
    };
    assert!(matches!(
        compile(&params),
        Err(FuelPriceError::InvalidArgument(_))
    ));
}

#[test]
fn out_of_range_order_point_is_rejected() {
    let params = ListStationsParams {
        orders: vec![OrderDirective::Distance {
            point: Coordinate {
                longitude: 7.0,
                latitude: 123.0,
            },
        }],
        ..Default::default()
    };
    assert!(matches!(
        compile(&params),
        Err(FuelPriceError::InvalidArgument(_))
    ));
}
