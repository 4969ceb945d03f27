use analytics::{enhance_financial_data, AnalyticsEngine, MarketReport};
use api_client::error::ApiError;
use api_client::{FmpClient, MarketDataClient};
use cache::{CacheKey, CachePolicy, CachedSnapshot, JsonFileStore, SnapshotStore};
use chrono::{DateTime, Utc};
use configuration::Config;
use core_types::{
    AnalystEstimate, CompanyRating, DateRangeQuery, Endpoint, FetchReport, FetchStatus,
    PriceTarget,
};
use serde::Serialize;
use std::sync::Arc;

pub mod error;

pub use error::EngineError;

/// Where the data behind a dashboard came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Network,
}

/// Everything the front end shows for one symbol and date range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub query: DateRangeQuery,
    pub source: DataSource,
    pub last_fetched: DateTime<Utc>,
    pub report: MarketReport,
    pub analyst_estimates: Vec<AnalystEstimate>,
    pub company_rating: Option<CompanyRating>,
    pub price_targets: Option<PriceTarget>,
    pub fetch_status: FetchReport,
    pub api_calls_count: u32,
}

/// The orchestrator behind a dashboard load.
///
/// A load is answered from the snapshot cache when the cache policy accepts
/// the stored entry; otherwise the four provider endpoints are fetched
/// concurrently, the history is enhanced and cached, and the analytics
/// pipeline runs over it.
pub struct DashboardEngine {
    client: Arc<dyn MarketDataClient>,
    // `None` when caching is disabled.
    store: Option<Arc<dyn SnapshotStore>>,
    policy: CachePolicy,
    analytics: AnalyticsEngine,
}

impl DashboardEngine {
    pub fn new(
        client: Arc<dyn MarketDataClient>,
        store: Option<Arc<dyn SnapshotStore>>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            client,
            store,
            policy,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Wires the FMP client and the JSON file cache from application settings.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let client: Arc<dyn MarketDataClient> = Arc::new(FmpClient::new(&config.provider)?);
        let store: Option<Arc<dyn SnapshotStore>> = if config.cache.enabled {
            Some(Arc::new(JsonFileStore::new(&config.cache.path)))
        } else {
            None
        };
        Ok(Self::new(client, store, CachePolicy::new(config.cache.max_age())))
    }

    /// Produces the dashboard for `query`.
    ///
    /// `force_refresh` skips the cache lookup; the fresh result is still
    /// written back. A failed or empty history fetch is an error, failures of
    /// the other endpoints only leave their payloads absent.
    pub async fn load(&self, query: &DateRangeQuery, force_refresh: bool) -> Result<Dashboard, EngineError> {
        let now = Utc::now();

        if !force_refresh {
            if let Some(snapshot) = self.cached(query, now) {
                tracing::info!(%query, age_minutes = snapshot.age_minutes(now), "Using cached data.");
                return self.assemble(snapshot, DataSource::Cache);
            }
        }

        tracing::info!(%query, "Fetching fresh data.");
        let snapshot = self.fetch(query, now).await?;
        self.persist(&snapshot);
        self.assemble(snapshot, DataSource::Network)
    }

    /// Looks up a usable snapshot. Store errors are logged and treated as a miss.
    fn cached(&self, query: &DateRangeQuery, now: DateTime<Utc>) -> Option<CachedSnapshot> {
        let store = self.store.as_ref()?;
        match store.get(&CacheKey::from(query)) {
            Ok(Some(snapshot)) if self.policy.is_valid_for(&snapshot, query, now) => Some(snapshot),
            Ok(Some(_)) => {
                tracing::debug!(%query, "Cached snapshot is stale or incomplete.");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, fetching instead.");
                None
            }
        }
    }

    /// Fetches all four endpoints concurrently and settles every one of them.
    async fn fetch(&self, query: &DateRangeQuery, now: DateTime<Utc>) -> Result<CachedSnapshot, EngineError> {
        let symbol = query.symbol.as_str();
        let (historical, estimates, rating, targets) = futures::join!(
            self.client.fetch_historical(query),
            self.client.fetch_analyst_estimates(symbol),
            self.client.fetch_company_rating(symbol),
            self.client.fetch_price_target(symbol),
        );

        let mut snapshot = CachedSnapshot::new(query.clone(), now);
        snapshot.api_calls_count = Endpoint::ALL.len() as u32;
        snapshot.fetch_status.set(Endpoint::HistoricalData, FetchStatus::from_result(&historical));
        snapshot.fetch_status.set(Endpoint::AnalystEstimates, FetchStatus::from_result(&estimates));
        snapshot.fetch_status.set(Endpoint::CompanyRating, FetchStatus::from_result(&rating));
        snapshot.fetch_status.set(Endpoint::PriceTargets, FetchStatus::from_result(&targets));

        snapshot.analyst_estimates = settle(Endpoint::AnalystEstimates, estimates).unwrap_or_default();
        snapshot.company_rating = settle(Endpoint::CompanyRating, rating).flatten();
        snapshot.price_targets = settle(Endpoint::PriceTargets, targets).flatten();

        let raw = historical?;
        if raw.is_empty() {
            tracing::warn!(%query, "Provider returned no records.");
            return Err(EngineError::NoData);
        }
        snapshot.historical_data = enhance_financial_data(&raw);

        tracing::info!(
            %query,
            records = snapshot.historical_data.len(),
            completed = snapshot.fetch_status.completed_calls(),
            "Fetch complete."
        );
        Ok(snapshot)
    }

    /// Writes the snapshot back. Failures are logged and never surface.
    fn persist(&self, snapshot: &CachedSnapshot) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.put(snapshot.clone()) {
            tracing::warn!(error = %e, "Failed to write snapshot to cache.");
        }
    }

    fn assemble(&self, snapshot: CachedSnapshot, source: DataSource) -> Result<Dashboard, EngineError> {
        let report = self.analytics.report_for(snapshot.historical_data)?;
        Ok(Dashboard {
            query: snapshot.query,
            source,
            last_fetched: snapshot.last_fetched,
            report,
            analyst_estimates: snapshot.analyst_estimates,
            company_rating: snapshot.company_rating,
            price_targets: snapshot.price_targets,
            fetch_status: snapshot.fetch_status,
            api_calls_count: snapshot.api_calls_count,
        })
    }
}

/// Degrades an optional endpoint's failure to `None`.
fn settle<T>(endpoint: Endpoint, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%endpoint, error = %e, "Endpoint failed, continuing without it.");
            None
        }
    }
}
