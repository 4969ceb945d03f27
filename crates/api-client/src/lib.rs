use crate::responses::{parse_first, parse_historical, parse_list};
use async_trait::async_trait;
use configuration::ProviderConfig;
use core_types::{AnalystEstimate, CompanyRating, DateRangeQuery, PriceTarget, RawRecord};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

pub mod error;
pub mod responses;

// Re-export the error type to provide a clean public API.
pub use error::ApiError;

/// The generic, abstract interface for a market-data provider.
/// This trait is the contract the dashboard engine uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches daily price history for the query's symbol and date range.
    async fn fetch_historical(&self, query: &DateRangeQuery) -> Result<Vec<RawRecord>, ApiError>;

    /// Fetches consensus analyst estimates, one entry per fiscal period.
    async fn fetch_analyst_estimates(&self, symbol: &str) -> Result<Vec<AnalystEstimate>, ApiError>;

    /// Fetches the latest company rating, if the provider has one.
    async fn fetch_company_rating(&self, symbol: &str) -> Result<Option<CompanyRating>, ApiError>;

    /// Fetches the analyst price-target consensus, if the provider has one.
    async fn fetch_price_target(&self, symbol: &str) -> Result<Option<PriceTarget>, ApiError>;
}

/// A concrete implementation of `MarketDataClient` for Financial Modeling Prep.
#[derive(Clone)]
pub struct FmpClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl FmpClient {
    pub fn new(provider: &ProviderConfig) -> Result<Self, ApiError> {
        let api_key = provider
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .user_agent(provider.user_agent.clone())
            .timeout(Duration::from_secs(provider.timeout_secs))
            .build()?;

        // Endpoint paths are joined relative to the base, so it must end in '/'.
        let mut base_url = Url::parse(&provider.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Builds the full request URL, API key included.
    fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("apikey", &self.api_key);
        Ok(url)
    }

    /// Issues a GET and returns the body of a successful response.
    ///
    /// Only the path is logged; the query string carries the API key.
    async fn get_text(&self, path: &str, params: &[(&str, &str)], symbol: &str) -> Result<String, ApiError> {
        let url = self.endpoint_url(path, params)?;
        tracing::debug!(path, symbol, "Requesting provider endpoint.");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Provider returned an error status.");
        }
        check_status(status, symbol, text)
    }
}

/// Maps a non-2xx status to the matching error; passes the body through otherwise.
pub fn check_status(status: StatusCode, symbol: &str, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        return Ok(body);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::NOT_FOUND => ApiError::SymbolNotFound(symbol.to_string()),
        _ => ApiError::Status {
            status: status.as_u16(),
            body,
        },
    })
}

#[async_trait]
impl MarketDataClient for FmpClient {
    async fn fetch_historical(&self, query: &DateRangeQuery) -> Result<Vec<RawRecord>, ApiError> {
        let symbol = query.symbol.to_uppercase();
        let from = query.start_date.to_string();
        let to = query.end_date.to_string();
        let path = format!("/api/v3/historical-price-full/{symbol}");

        let body = self
            .get_text(
                &path,
                &[("symbol", symbol.as_str()), ("from", from.as_str()), ("to", to.as_str())],
                &symbol,
            )
            .await?;
        let records = parse_historical(&body, &symbol)?;

        tracing::info!(symbol, records = records.len(), "Fetched historical prices.");
        Ok(records)
    }

    async fn fetch_analyst_estimates(
        &self,
        symbol: &str,
    ) -> Result<Vec<AnalystEstimate>, ApiError> {
        let symbol = symbol.to_uppercase();
        let path = format!("/api/v3/analyst-estimates/{symbol}");
        let body = self.get_text(&path, &[], &symbol).await?;
        parse_list(&body)
    }

    async fn fetch_company_rating(&self, symbol: &str) -> Result<Option<CompanyRating>, ApiError> {
        let symbol = symbol.to_uppercase();
        let body = self
            .get_text("/stable/ratings-snapshot", &[("symbol", symbol.as_str())], &symbol)
            .await?;
        parse_first(&body)
    }

    async fn fetch_price_target(&self, symbol: &str) -> Result<Option<PriceTarget>, ApiError> {
        let symbol = symbol.to_uppercase();
        let body = self
            .get_text(
                "/stable/price-target-consensus",
                &[("symbol", symbol.as_str())],
                &symbol,
            )
            .await?;
        parse_first(&body)
    }
}
