use super::round_to;
use crate::config::AVERAGE_PRECISION;
use crate::grouping::group_by;
use crate::models::{GasPriceAverage, Station};

/// Mean price of each gas over every price attached to `stations`.
///
/// Only gases that actually occur produce an entry, in first-seen order; an
/// empty station set yields an empty list.
pub fn price_averages(stations: &[Station]) -> Vec<GasPriceAverage> {
    let prices = stations
        .iter()
        .flat_map(|s| s.prices.iter().flatten());

    group_by(prices, |p| p.gas_name)
        .into_iter()
        .map(|(gas, group)| {
            let total: f64 = group.iter().map(|p| p.price).sum();
            GasPriceAverage {
                gas_name: gas,
                price_average: round_to(total / group.len() as f64, AVERAGE_PRECISION),
            }
        })
        .collect()
}
