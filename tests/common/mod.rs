//! Shared test fixtures for the fuel price SDK integration tests.
//!
//! Provides `setup_sample_sdk()` which creates an in-memory SDK populated
//! with a handful of stations around Antibes plus a far-away one in Paris,
//! each with attached prices, and a few historical prices recorded at fixed
//! offsets from [`now()`].

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use fuelprice_sdk::models::{Coordinate, Gas, NewPrice, Schedule};
use fuelprice_sdk::{FuelPriceSdk, StationRecord};

pub const ANTIBES: i64 = 1;
pub const JUAN_LES_PINS: i64 = 2;
pub const CANNES: i64 = 3;
pub const NICE: i64 = 4;
pub const PARIS: i64 = 5;

/// Fixed clock used by every time-windowed test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn antibes_center() -> Coordinate {
    Coordinate::new(7.125102, 43.580418).unwrap()
}

/// Create an in-memory SDK holding the sample stations.
pub fn setup_sample_sdk() -> FuelPriceSdk {
    let sdk = FuelPriceSdk::builder().in_memory().build().unwrap();

    // -- stations -------------------------------------------------------------
    let fresh = now() - Duration::hours(1);
    let stations = vec![
        station(
            ANTIBES,
            "Relais Antibes",
            "1 Avenue Robert Soleau, Antibes",
            (7.125102, 43.580418),
            vec![
                NewPrice::new(Gas::Gazole, 1.80, fresh),
                NewPrice::new(Gas::Sp98, 1.95, fresh),
                NewPrice::new(Gas::E10, 1.85, fresh),
            ],
        ),
        station(
            JUAN_LES_PINS,
            "Station Juan",
            "Boulevard Charles Guillaumont, Juan-les-Pins",
            (7.1118, 43.5682),
            vec![
                NewPrice::new(Gas::Gazole, 1.75, fresh),
                NewPrice::new(Gas::Sp98, 2.01, fresh),
            ],
        ),
        station(
            CANNES,
            "Cannes La Bocca",
            "Avenue Francis Tonner, Cannes",
            (7.0174, 43.5528),
            vec![
                NewPrice::new(Gas::Gazole, 1.70, fresh),
                NewPrice::new(Gas::E85, 0.89, fresh),
            ],
        ),
        station(
            NICE,
            "Nice Arenas",
            "Promenade des Anglais, Nice",
            (7.2620, 43.7034),
            vec![
                NewPrice::new(Gas::Gazole, 1.83, fresh),
                NewPrice::new(Gas::Sp98, 1.99, fresh),
                NewPrice::new(Gas::Gplc, 0.99, fresh),
            ],
        ),
        station(
            PARIS,
            "Paris Rivoli",
            "Rue de Rivoli, Paris",
            (2.3522, 48.8566),
            vec![NewPrice::new(Gas::Sp95, 1.88, fresh)],
        ),
    ];

    let store = sdk.store();
    for mut record in stations {
        if record.id == ANTIBES {
            record.schedules = vec![
                schedule(2, "Mardi", true),
                schedule(1, "Lundi", true),
                schedule(7, "Dimanche", false),
            ];
        }
        store.upsert_station(&record).unwrap();
    }

    // -- historical prices ----------------------------------------------------
    store
        .record_price(ANTIBES, &NewPrice::new(Gas::Gazole, 1.50, days_ago(30)))
        .unwrap();
    store
        .record_price(ANTIBES, &NewPrice::new(Gas::Gazole, 1.60, days_ago(10)))
        .unwrap();
    store
        .record_price(ANTIBES, &NewPrice::new(Gas::Sp98, 1.90, days_ago(20)))
        .unwrap();
    store
        .record_price(JUAN_LES_PINS, &NewPrice::new(Gas::Gazole, 1.40, days_ago(15)))
        .unwrap();

    sdk
}

pub fn station(
    id: i64,
    name: &str,
    address: &str,
    (longitude, latitude): (f64, f64),
    prices: Vec<NewPrice>,
) -> StationRecord {
    StationRecord {
        id,
        name: name.to_string(),
        address: address.to_string(),
        position: Coordinate::new(longitude, latitude).unwrap(),
        prices,
        schedules: Vec::new(),
    }
}

pub fn schedule(schedule_id: i32, day: &str, open: bool) -> Schedule {
    Schedule {
        schedule_id,
        day: day.to_string(),
        open,
        opening: if open { "06:00" } else { "" }.to_string(),
        closing: if open { "22:00" } else { "" }.to_string(),
    }
}

/// Ids of a station list, in returned order.
pub fn ids(stations: &[fuelprice_sdk::models::Station]) -> Vec<i64> {
    stations.iter().map(|s| s.id).collect()
}
