use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid provider base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("No API key configured. Set provider.api_key or FMP_API_KEY.")]
    MissingApiKey,

    #[error("Invalid API key or unauthorized access")]
    Unauthorized,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Symbol {0} not found")]
    SymbolNotFound(String),

    #[error("HTTP error! status: {status}, body: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 200 with an error message in the body.
    #[error("The API request returned an error: {0}")]
    ApiError(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Unexpected API response format: {0}")]
    UnexpectedFormat(String),
}
