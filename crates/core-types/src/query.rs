use crate::error::CoreError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated request for one symbol over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRangeQuery {
    /// Builds a query, upper-casing the symbol.
    ///
    /// Fails when the symbol is blank or the range is inverted.
    pub fn new(symbol: &str, start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, CoreError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "Symbol parameter missing".to_string(),
            ));
        }
        if start_date > end_date {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("start {start_date} is after end {end_date}"),
            ));
        }

        Ok(Self {
            symbol: symbol.to_uppercase(),
            start_date,
            end_date,
        })
    }

    /// The `lookback_days` calendar days ending at (and including) `end_date`.
    pub fn trailing(symbol: &str, end_date: NaiveDate, lookback_days: u32) -> Result<Self, CoreError> {
        let start_date = end_date
            .checked_sub_days(Days::new(u64::from(lookback_days.saturating_sub(1))))
            .ok_or_else(|| {
                CoreError::InvalidInput("lookback".to_string(), format!("{lookback_days} days"))
            })?;
        Self::new(symbol, start_date, end_date)
    }

    /// Calendar days covered, both ends included.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl fmt::Display for DateRangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} to {}", self.symbol, self.start_date, self.end_date)
    }
}
