//! # Tickerscope Analytics
//!
//! The derived-metrics pipeline. Raw daily records flow one way through it:
//!
//! ```text
//! RawRecord[] -> EnhancedRecord[] -> { DailyMetric[], WeeklyMetric[], MonthlyMetric[], TradingStats }
//! ```
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of the provider or the cache. It
//!   depends only on `core-types`.
//! - **Window-relative:** percentiles and intensities are computed against the
//!   records passed in and nothing else.
//! - **Order-agnostic:** every time-series step sorts by date itself.
//!
//! ## Public API
//!
//! - `classify`: percentile ranking, volume levels, heatmap buckets, direction, volatility.
//! - `enhance_financial_data`: raw records to enhanced records.
//! - `calculate_daily_metrics`, `calculate_weekly_metrics`, `calculate_monthly_metrics`.
//! - `AnalyticsEngine`: summary statistics and the whole-pipeline `analyze` entry point.

// Declare the modules that constitute this crate.
pub mod classify;
pub mod daily;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod periods;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use daily::calculate_daily_metrics;
pub use engine::AnalyticsEngine;
pub use enhance::enhance_financial_data;
pub use error::AnalyticsError;
pub use periods::{calculate_monthly_metrics, calculate_weekly_metrics};
pub use report::{
    DailyMetric, DateRange, DayReturn, MarketReport, MonthlyMetric, PriceRange, TradingStats,
    WeeklyMetric,
};
