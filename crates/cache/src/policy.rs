use crate::snapshot::CachedSnapshot;
use chrono::{DateTime, Duration, Utc};
use core_types::DateRangeQuery;

/// Decides whether a cached snapshot can stand in for a fresh fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` keeps entries until the query changes.
    pub max_age: Option<Duration>,
}

impl CachePolicy {
    pub fn new(max_age: Option<Duration>) -> Self {
        Self { max_age }
    }

    /// True when the snapshot answers exactly this query with usable history.
    ///
    /// Symbol, start and end must match, the historical fetch must have
    /// succeeded with at least one record, and the snapshot must be younger
    /// than `max_age` when one is set. The fundamentals endpoints do not
    /// affect validity.
    pub fn is_valid_for(&self, snapshot: &CachedSnapshot, query: &DateRangeQuery, now: DateTime<Utc>) -> bool {
        let same_query = snapshot.query.symbol == query.symbol
            && snapshot.query.start_date == query.start_date
            && snapshot.query.end_date == query.end_date;
        if !same_query {
            return false;
        }

        if !snapshot.fetch_status.historical_data.is_success() || snapshot.historical_data.is_empty() {
            return false;
        }

        match self.max_age {
            Some(max_age) => now - snapshot.last_fetched < max_age,
            None => true,
        }
    }
}
