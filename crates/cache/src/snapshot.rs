use crate::error::CacheError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{
    AnalystEstimate, CompanyRating, DateRangeQuery, EnhancedRecord, Endpoint, FetchReport,
    PriceTarget,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&DateRangeQuery> for CacheKey {
    fn from(query: &DateRangeQuery) -> Self {
        Self {
            symbol: query.symbol.clone(),
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.symbol, self.start_date, self.end_date)
    }
}

/// Everything one dashboard load fetched, as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub query: DateRangeQuery,
    pub last_fetched: DateTime<Utc>,
    pub historical_data: Vec<EnhancedRecord>,
    pub analyst_estimates: Vec<AnalystEstimate>,
    pub company_rating: Option<CompanyRating>,
    pub price_targets: Option<PriceTarget>,
    /// Provider requests made to build this snapshot.
    pub api_calls_count: u32,
    pub fetch_status: FetchReport,
}

impl CachedSnapshot {
    /// An empty snapshot with every endpoint still pending.
    pub fn new(query: DateRangeQuery, last_fetched: DateTime<Utc>) -> Self {
        Self {
            query,
            last_fetched,
            historical_data: Vec::new(),
            analyst_estimates: Vec::new(),
            company_rating: None,
            price_targets: None,
            api_calls_count: 0,
            fetch_status: FetchReport::new(),
        }
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::from(&self.query)
    }

    /// Whole minutes since the snapshot was fetched, never negative.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_fetched).num_minutes().max(0)
    }

    /// Error messages of the endpoints that failed.
    pub fn errors(&self) -> Vec<(Endpoint, &str)> {
        self.fetch_status.failures()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<SnapshotStats, CacheError> {
        Ok(SnapshotStats {
            symbol: self.query.symbol.clone(),
            date_range: format!("{} to {}", self.query.start_date, self.query.end_date),
            data_age_minutes: self.age_minutes(now),
            api_calls_count: self.api_calls_count,
            completed_calls: self.fetch_status.completed_calls(),
            total_calls: Endpoint::ALL.len(),
            total_size: serde_json::to_vec(self)?.len(),
        })
    }
}

/// A summary of one cached snapshot, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStats {
    pub symbol: String,
    pub date_range: String,
    pub data_age_minutes: i64,
    pub api_calls_count: u32,
    /// Endpoints whose last fetch succeeded.
    pub completed_calls: usize,
    pub total_calls: usize,
    /// Serialized size in bytes.
    pub total_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::FetchStatus;

    fn query() -> DateRangeQuery {
        DateRangeQuery::new(
            "aapl",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn key_follows_the_query() {
        let snapshot = CachedSnapshot::new(query(), Utc::now());
        let key = snapshot.key();
        assert_eq!(key.symbol, "AAPL");
        assert_eq!(key.to_string(), "AAPL:2024-01-01:2024-01-31");
    }

    #[test]
    fn stats_count_successful_endpoints() {
        let fetched = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let mut snapshot = CachedSnapshot::new(query(), fetched);
        snapshot.api_calls_count = 4;
        snapshot
            .fetch_status
            .set(Endpoint::HistoricalData, FetchStatus::Success);
        snapshot
            .fetch_status
            .set(Endpoint::CompanyRating, FetchStatus::Success);
        snapshot.fetch_status.set(
            Endpoint::PriceTargets,
            FetchStatus::Failed {
                message: "API rate limit exceeded. Please try again later.".to_string(),
            },
        );

        let stats = snapshot.stats(fetched + Duration::seconds(150)).unwrap();
        assert_eq!(stats.symbol, "AAPL");
        assert_eq!(stats.date_range, "2024-01-01 to 2024-01-31");
        assert_eq!(stats.data_age_minutes, 2);
        assert_eq!(stats.api_calls_count, 4);
        assert_eq!(stats.completed_calls, 2);
        assert_eq!(stats.total_calls, 4);
        assert_eq!(stats.total_size, serde_json::to_vec(&snapshot).unwrap().len());

        let errors = snapshot.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, Endpoint::PriceTargets);
    }

    #[test]
    fn age_is_clamped_for_clock_skew() {
        let fetched = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let snapshot = CachedSnapshot::new(query(), fetched);
        assert_eq!(snapshot.age_minutes(fetched - Duration::minutes(5)), 0);
    }
}
