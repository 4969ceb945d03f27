use api_client::error::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("API client error: {0}")]
    ApiClient(#[from] ApiError),

    #[error("No data found for the selected date range")]
    NoData,

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}

impl EngineError {
    /// A message fit to show the end user, without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::ApiClient(ApiError::Network(_)) => {
                "Network error: Unable to reach financial data provider".to_string()
            }
            EngineError::ApiClient(ApiError::Deserialization(_)) => {
                "Data parsing error: Invalid response from financial data provider".to_string()
            }
            EngineError::ApiClient(e) => e.to_string(),
            EngineError::NoData => self.to_string(),
            EngineError::Analytics(_) => "Failed to fetch financial data".to_string(),
        }
    }
}
