use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access the cache file: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),
}
