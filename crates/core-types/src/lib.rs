//! # Tickerscope Core Types
//!
//! The shared vocabulary of the workspace: daily market records, the fields
//! derived from them, company fundamentals and the query/fetch bookkeeping
//! types. This crate has no logic beyond validation and small helpers.

pub mod enums;
pub mod error;
pub mod fetch;
pub mod fundamentals;
pub mod query;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Endpoint, HeatmapColor, PriceDirection, VolumeLevel};
pub use error::CoreError;
pub use fetch::{FetchReport, FetchStatus};
pub use fundamentals::{AnalystEstimate, CompanyRating, PriceTarget};
pub use query::DateRangeQuery;
pub use structs::{EnhancedRecord, RawRecord};
