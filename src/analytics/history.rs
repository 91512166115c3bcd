use std::collections::HashSet;

use chrono::Datelike;

use crate::grouping::group_by;
use crate::models::{PeriodPrice, Price, PriceHistory};

/// Keep the first price of each gas per calendar day (UTC).
///
/// `prices` must be in ascending timestamp order.
pub fn dedup_daily(prices: &[Price]) -> Vec<&Price> {
    let mut seen = HashSet::new();
    prices
        .iter()
        .filter(|p| seen.insert((p.gas_name, p.last_update.date_naive())))
        .collect()
}

/// Build one weekday-ordered series per gas from raw in-window prices.
///
/// Prices are deduplicated per day, grouped by gas in first-seen order and
/// sorted by weekday ordinal (Sunday = 0). A series that then starts on a
/// Sunday has that entry moved to its end, so weeks read Monday first.
pub fn build_history(prices: &[Price]) -> Vec<PriceHistory> {
    group_by(dedup_daily(prices), |p| p.gas_name)
        .into_iter()
        .map(|(gas, group)| {
            let mut data: Vec<PeriodPrice> = group
                .into_iter()
                .map(|p| PeriodPrice {
                    date: p.last_update.weekday().num_days_from_sunday(),
                    price: p.price,
                })
                .collect();
            data.sort_by_key(|entry| entry.date);
            rotate_leading_sunday(&mut data);
            PriceHistory { gas, data }
        })
        .collect()
}

fn rotate_leading_sunday(data: &mut Vec<PeriodPrice>) {
    if data.first().is_some_and(|entry| entry.date == 0) {
        let sunday = data.remove(0);
        data.push(sunday);
    }
}
