use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FuelPriceError, Result};

// ---------------------------------------------------------------------------
// Period — Named lookback window for historical price queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    All,
    LastYear,
    LastMonth,
    LastWeek,
    LastDay,
}

impl Period {
    pub const ALL_PERIODS: [Period; 5] = [
        Period::All,
        Period::LastYear,
        Period::LastMonth,
        Period::LastWeek,
        Period::LastDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::All => "ALL",
            Period::LastYear => "LAST_YEAR",
            Period::LastMonth => "LAST_MONTH",
            Period::LastWeek => "LAST_WEEK",
            Period::LastDay => "LAST_DAY",
        }
    }

    /// Earliest timestamp inside the window ending at `now`.
    ///
    /// `None` means the window has no lower bound. `LastWeek` starts at
    /// midnight UTC seven days back and `LastDay` is exactly 24 hours.
    /// `LastMonth` is one calendar month, not 30 days: on 1 March it starts
    /// on 1 February. `LastYear` is twelve calendar months. Both clamp to
    /// the last day of a shorter month.
    pub fn min_timestamp(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::All => None,
            Period::LastYear => now.checked_sub_months(Months::new(12)),
            Period::LastMonth => now.checked_sub_months(Months::new(1)),
            Period::LastWeek => {
                let day = (now - Duration::days(7)).date_naive();
                day.and_hms_opt(0, 0, 0)
                    .map(|midnight| Utc.from_utc_datetime(&midnight))
            }
            Period::LastDay => Some(now - Duration::days(1)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = FuelPriceError;

    fn from_str(s: &str) -> Result<Self> {
        Period::ALL_PERIODS
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FuelPriceError::InvalidArgument(format!("unknown period: {s:?}")))
    }
}
