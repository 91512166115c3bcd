use std::collections::HashMap;

use tracing::warn;

use super::round_to;
use crate::config::EVOLUTION_PRECISION;
use crate::grouping::group_by;
use crate::models::{
    AverageEvolution, Gas, GasEvolution, Period, Price, PriceTrendsResult, StationEvolution,
};

/// Percentage evolution of each gas between its current price and the oldest
/// historical price in the window.
///
/// `current` is the station's attached price collection; the latest entry per
/// gas is taken as the current price. `historical` holds in-window prices not
/// attached to the station. Gases without a historical observation are left
/// out, as are gases whose baseline price is zero.
pub fn station_evolution(current: &[Price], historical: &[Price]) -> Vec<GasEvolution> {
    let baselines: HashMap<Gas, &Price> = group_by(historical.iter(), |p| p.gas_name)
        .into_iter()
        .filter_map(|(gas, group)| {
            group
                .into_iter()
                .reduce(|oldest, candidate| {
                    if candidate.last_update < oldest.last_update {
                        candidate
                    } else {
                        oldest
                    }
                })
                .map(|oldest| (gas, oldest))
        })
        .collect();

    let mut out = Vec::new();
    for (gas, prices) in group_by(current.iter(), |p| p.gas_name) {
        let Some(baseline) = baselines.get(&gas) else {
            continue;
        };
        let Some(latest) = prices.into_iter().reduce(|latest, candidate| {
            if candidate.last_update > latest.last_update {
                candidate
            } else {
                latest
            }
        }) else {
            continue;
        };

        if baseline.price == 0.0 {
            warn!(gas = %gas, price_id = baseline.id, "skipping evolution over a zero baseline price");
            continue;
        }

        out.push(GasEvolution {
            gas_name: gas,
            evolution: (latest.price - baseline.price) / baseline.price * 100.0,
        });
    }
    out
}

/// Average each gas's evolution across stations.
///
/// A non-empty `allowed` list restricts the gases reported. Averages are
/// rendered with two decimals.
pub fn average_evolutions(
    period: Period,
    per_station: &[StationEvolution],
    allowed: &[Gas],
) -> PriceTrendsResult {
    let evolutions = per_station.iter().flat_map(|s| s.evolution.iter());

    let evolutions = group_by(evolutions, |e| e.gas_name)
        .into_iter()
        .filter(|(gas, _)| allowed.is_empty() || allowed.contains(gas))
        .map(|(gas, group)| {
            let total: f64 = group.iter().map(|e| e.evolution).sum();
            // `+ 0.0` turns a rounded -0.0 into 0.0 so it never renders as "-0.00"
            let average = round_to(total / group.len() as f64, EVOLUTION_PRECISION) + 0.0;
            AverageEvolution {
                gas_name: gas,
                evolution: format!("{:.2}", average),
            }
        })
        .collect();

    PriceTrendsResult { period, evolutions }
}
