//! Connection integration tests: raw SQL execution, schema setup,
//! transactions and on-disk databases.

mod common;

use fuelprice_sdk::models::{Gas, NewPrice};
use fuelprice_sdk::{Connection, FuelPriceError, FuelPriceSdk, SqlValue};

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_correct_rows() {
    let sdk = common::setup_sample_sdk();
    let rows = sdk
        .sql("SELECT id, name FROM stations ORDER BY id", &[])
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["name"], "Relais Antibes");
}

#[test]
fn execute_with_params() {
    let sdk = common::setup_sample_sdk();
    let rows = sdk
        .sql(
            "SELECT * FROM current_prices WHERE gas_name = ?",
            &[SqlValue::from("SP98")],
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn timestamps_come_back_as_rfc3339() {
    let sdk = common::setup_sample_sdk();
    let rows = sdk
        .sql(
            "SELECT last_update FROM prices WHERE station_id = ? ORDER BY last_update LIMIT 1",
            &[SqlValue::Int(common::ANTIBES)],
        )
        .unwrap();
    assert_eq!(rows[0]["last_update"], "2026-09-16T12:00:00+00:00");
}

#[test]
fn execute_scalar_returns_first_column() {
    let sdk = common::setup_sample_sdk();
    let count = sdk
        .connection()
        .execute_scalar("SELECT COUNT(*) FROM station_prices", &[])
        .unwrap();
    // 3 + 2 + 2 + 3 + 1 attached prices
    assert_eq!(count, Some(serde_json::json!(11)));
}

#[test]
fn execute_scalar_empty_result_is_none() {
    let conn = Connection::open_in_memory().unwrap();
    let value = conn
        .execute_scalar("SELECT id FROM stations WHERE id = ?", &[SqlValue::Int(1)])
        .unwrap();
    assert!(value.is_none());
}

#[test]
fn invalid_sql_surfaces_store_error() {
    let conn = Connection::open_in_memory().unwrap();
    let err = conn.execute("SELECT * FROM no_such_table", &[]).unwrap_err();
    assert!(matches!(err, FuelPriceError::DuckDb(_)));
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn failed_transaction_rolls_back() {
    let conn = Connection::open_in_memory().unwrap();
    let result: fuelprice_sdk::Result<()> = conn.in_transaction(|tx| {
        tx.execute_statement(
            "INSERT INTO stations (id, name) VALUES (?, ?)",
            &[SqlValue::Int(42), SqlValue::from("Temporary")],
        )?;
        Err(FuelPriceError::InvalidArgument("abort".into()))
    });
    assert!(result.is_err());

    let rows = conn.execute("SELECT * FROM stations", &[]).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn non_finite_price_is_rejected() {
    let sdk = common::setup_sample_sdk();
    let err = sdk
        .store()
        .record_price(common::ANTIBES, &NewPrice::new(Gas::Gazole, f64::INFINITY, common::now()))
        .unwrap_err();
    assert!(matches!(err, FuelPriceError::InvalidArgument(_)));
}

// ---------------------------------------------------------------------------
// On-disk databases
// ---------------------------------------------------------------------------

#[test]
fn on_disk_database_survives_reopen() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("nested").join("fuelprice.duckdb");

    {
        let sdk = FuelPriceSdk::builder().database_path(&path).build().unwrap();
        sdk.store()
            .upsert_station(&common::station(
                7,
                "Relais Biot",
                "Route de Biot",
                (7.0956, 43.6280),
                vec![NewPrice::new(Gas::E10, 1.84, common::now())],
            ))
            .unwrap();
    }

    assert!(path.exists());
    let sdk = FuelPriceSdk::builder().database_path(&path).build().unwrap();
    let station = sdk.stations().get(7).unwrap().unwrap();
    assert_eq!(station.name.as_deref(), Some("Relais Biot"));
    assert_eq!(station.prices.unwrap()[0].price, 1.84);
}

#[test]
fn schema_creation_is_idempotent() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("fuelprice.duckdb");

    drop(Connection::open(&path).unwrap());
    let conn = Connection::open(&path).unwrap();
    let rows = conn.execute("SELECT * FROM price_trends", &[]).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn display_names_the_storage() {
    let sdk = FuelPriceSdk::builder().in_memory().build().unwrap();
    assert_eq!(sdk.to_string(), "FuelPriceSdk(storage=memory)");
}
