use chrono::NaiveDate;
use core_types::EnhancedRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One session of the derived daily series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetric {
    pub date: NaiveDate,
    /// Percent change of the close against the previous session; 0 on the first.
    #[serde(rename = "return")]
    pub daily_return: Decimal,
    pub volatility: Decimal,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_avg: Option<Decimal>,
}

/// A rollup over a rolling seven-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetric {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub weekly_return: Decimal,
    pub avg_volatility: Decimal,
    pub total_volume: u64,
    pub highest_price: Decimal,
    pub lowest_price: Decimal,
    pub trading_days: usize,
}

/// A rollup over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetric {
    /// English month name, e.g. "January".
    pub month: String,
    /// 1-12.
    pub month_number: u32,
    pub year: i32,
    pub monthly_return: Decimal,
    pub avg_volatility: Decimal,
    pub total_volume: u64,
    pub highest_price: Decimal,
    pub lowest_price: Decimal,
    pub trading_days: usize,
    pub win_rate: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayReturn {
    pub date: Option<NaiveDate>,
    #[serde(rename = "return")]
    pub daily_return: Decimal,
}

/// Whole-window summary statistics.
///
/// This is the output of `AnalyticsEngine::trading_stats`. An empty window
/// produces the zeroed value from [`TradingStats::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingStats {
    pub total_trading_days: usize,
    pub date_range: DateRange,
    pub avg_daily_volume: Decimal,
    pub total_volume: u64,
    pub price_range: PriceRange,

    // Returns, all in percent.
    pub total_return: Decimal,
    pub avg_daily_return: Decimal,

    // Risk
    /// Population standard deviation of the daily returns.
    pub volatility: Decimal,
    /// Annualised over 252 sessions. Divides by 1 when volatility is zero.
    pub sharpe_ratio: Decimal,
    /// Largest peak-to-trough fall of the summed (not compounded) daily returns.
    pub max_drawdown: Decimal,

    pub win_rate: Decimal,
    pub best_day: DayReturn,
    pub worst_day: DayReturn,
}

impl TradingStats {
    /// Creates a new, zeroed-out TradingStats.
    pub fn new() -> Self {
        Self {
            total_trading_days: 0,
            date_range: DateRange::default(),
            avg_daily_volume: Decimal::ZERO,
            total_volume: 0,
            price_range: PriceRange::default(),
            total_return: Decimal::ZERO,
            avg_daily_return: Decimal::ZERO,
            volatility: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
            win_rate: Decimal::ZERO,
            best_day: DayReturn::default(),
            worst_day: DayReturn::default(),
        }
    }
}

impl Default for TradingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the presentation layer renders for one fetched window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub records: Vec<EnhancedRecord>,
    pub daily: Vec<DailyMetric>,
    pub weekly: Vec<WeeklyMetric>,
    pub monthly: Vec<MonthlyMetric>,
    pub stats: TradingStats,
}
