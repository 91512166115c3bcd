//! Unit tests for the SqlBuilder query construction.

use chrono::{TimeZone, Utc};
use fuelprice_sdk::{SqlBuilder, SqlValue};

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("stations").build();
    assert_eq!(sql, "SELECT *\nFROM stations");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("stations s")
        .select(&["s.id", "s.name"])
        .build();
    assert!(sql.starts_with("SELECT s.id, s.name\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("prices")
        .where_eq("gas_name", "SP98")
        .build();
    assert!(sql.contains("WHERE gas_name = ?"));
    assert_eq!(params, vec![SqlValue::from("SP98")]);
}

#[test]
fn where_gte_binds_timestamp() {
    let since = Utc.with_ymd_and_hms(2026, 9, 16, 0, 0, 0).unwrap();
    let (sql, params) = SqlBuilder::new("prices")
        .where_gte("last_update", since)
        .build();
    assert!(sql.contains("WHERE last_update >= ?"));
    assert_eq!(params, vec![SqlValue::Timestamp(since)]);
}

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("station_prices")
        .where_in("station_id", &[SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)])
        .build();
    assert!(sql.contains("station_id IN (?, ?, ?)"));
    assert_eq!(params.len(), 3);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("station_prices")
        .where_in("station_id", &[])
        .build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn multiple_where_clauses_joined_with_and() {
    let (sql, params) = SqlBuilder::new("prices")
        .where_eq("station_id", 1i64)
        .where_eq("gas_name", "Gazole")
        .build();
    assert!(sql.contains("WHERE station_id = ? AND gas_name = ?"));
    assert_eq!(params, vec![SqlValue::Int(1), SqlValue::from("Gazole")]);
}

#[test]
fn where_or_groups_conditions() {
    let (sql, params) = SqlBuilder::new("current_prices")
        .where_or(&[
            ("gas_name = ?", SqlValue::from("Gazole")),
            ("gas_name = ?", SqlValue::from("E85")),
        ])
        .build();
    assert!(sql.contains("WHERE (gas_name = ? OR gas_name = ?)"));
    assert_eq!(params.len(), 2);
}

#[test]
fn where_or_empty_is_noop() {
    let (sql, params) = SqlBuilder::new("current_prices").where_or(&[]).build();
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

// ---------------------------------------------------------------------------
// Parameter ordering
// ---------------------------------------------------------------------------

#[test]
fn params_follow_clause_order_not_call_order() {
    let (sql, params) = SqlBuilder::new("stations s")
        .order_by_with("abs(s.latitude - ?) ASC", &[SqlValue::Real(43.5)])
        .where_eq("s.name", "Relais")
        .join_with(
            "JOIN current_prices g0 ON g0.station_id = s.id AND g0.gas_name = ?",
            &[SqlValue::from("SP98")],
        )
        .build();

    let join_at = sql.find("JOIN").unwrap();
    let where_at = sql.find("WHERE").unwrap();
    let order_at = sql.find("ORDER BY").unwrap();
    assert!(join_at < where_at && where_at < order_at);
    assert_eq!(
        params,
        vec![
            SqlValue::from("SP98"),
            SqlValue::from("Relais"),
            SqlValue::Real(43.5),
        ]
    );
}

// ---------------------------------------------------------------------------
// ORDER BY, LIMIT, OFFSET
// ---------------------------------------------------------------------------

#[test]
fn order_by_accumulates() {
    let (sql, _) = SqlBuilder::new("stations s")
        .order_by(&["g0.price DESC"])
        .order_by(&["s.id ASC"])
        .build();
    assert!(sql.contains("ORDER BY g0.price DESC, s.id ASC"));
}

#[test]
fn limit_and_offset_render_last() {
    let (sql, _) = SqlBuilder::new("stations")
        .order_by(&["id ASC"])
        .limit(10)
        .offset(20)
        .build();
    assert!(sql.ends_with("ORDER BY id ASC\nLIMIT 10\nOFFSET 20"));
}
