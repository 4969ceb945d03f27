//! Weekly and monthly rollups of the enhanced daily records.
//!
//! The two bucketings are deliberately different. Weeks are rolling seven-day
//! windows anchored on whichever session opens the bucket, so weekends and
//! holidays shift where the next week starts. Months are plain calendar months.

use crate::daily::{percent_change, sorted_by_date};
use crate::report::{MonthlyMetric, WeeklyMetric};
use chrono::Datelike;
use core_types::EnhancedRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Width of a weekly bucket in calendar days.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Figures shared by both bucket kinds. `bucket` must be non-empty and sorted.
struct BucketSummary {
    period_return: Decimal,
    avg_volatility: Decimal,
    total_volume: u64,
    highest_price: Decimal,
    lowest_price: Decimal,
    trading_days: usize,
}

impl BucketSummary {
    fn of(bucket: &[&EnhancedRecord]) -> Self {
        let first = bucket[0];
        let last = bucket[bucket.len() - 1];

        let volatility_sum: Decimal = bucket.iter().map(|r| r.volatility).sum();
        let highest_price = bucket
            .iter()
            .map(|r| r.raw.high)
            .fold(first.raw.high, Decimal::max);
        let lowest_price = bucket
            .iter()
            .map(|r| r.raw.low)
            .fold(first.raw.low, Decimal::min);

        Self {
            period_return: percent_change(first.raw.close, last.raw.close),
            avg_volatility: volatility_sum / Decimal::from(bucket.len() as u64),
            total_volume: bucket.iter().map(|r| r.raw.volume).sum(),
            highest_price,
            lowest_price,
            trading_days: bucket.len(),
        }
    }
}

/// Groups sessions into rolling seven-day buckets.
///
/// A session joins the open bucket while fewer than seven whole days have
/// passed since the bucket's first session; otherwise it starts a new one.
pub fn calculate_weekly_metrics(records: &[EnhancedRecord]) -> Vec<WeeklyMetric> {
    let mut weeks = Vec::new();
    let mut bucket: Vec<&EnhancedRecord> = Vec::new();

    for record in sorted_by_date(records) {
        if let Some(anchor) = bucket.first() {
            if (record.raw.date - anchor.raw.date).num_days() >= WEEK_WINDOW_DAYS {
                weeks.push(summarize_week(&bucket));
                bucket.clear();
            }
        }
        bucket.push(record);
    }
    if !bucket.is_empty() {
        weeks.push(summarize_week(&bucket));
    }

    tracing::debug!(weeks = weeks.len(), "Built weekly rollups.");
    weeks
}

fn summarize_week(bucket: &[&EnhancedRecord]) -> WeeklyMetric {
    let summary = BucketSummary::of(bucket);
    WeeklyMetric {
        week_start: bucket[0].raw.date,
        week_end: bucket[bucket.len() - 1].raw.date,
        weekly_return: summary.period_return,
        avg_volatility: summary.avg_volatility,
        total_volume: summary.total_volume,
        highest_price: summary.highest_price,
        lowest_price: summary.lowest_price,
        trading_days: summary.trading_days,
    }
}

/// Groups sessions by calendar month, in chronological order.
pub fn calculate_monthly_metrics(records: &[EnhancedRecord]) -> Vec<MonthlyMetric> {
    let mut months: BTreeMap<(i32, u32), Vec<&EnhancedRecord>> = BTreeMap::new();
    // Sorting first keeps every bucket in date order as it is filled.
    for record in sorted_by_date(records) {
        months
            .entry((record.raw.date.year(), record.raw.date.month()))
            .or_default()
            .push(record);
    }

    months
        .into_iter()
        .map(|((year, month_number), bucket)| {
            let summary = BucketSummary::of(&bucket);
            let winning_days = bucket
                .iter()
                .filter(|r| r.raw.change_percent > Decimal::ZERO)
                .count();

            MonthlyMetric {
                month: bucket[0].raw.date.format("%B").to_string(),
                month_number,
                year,
                monthly_return: summary.period_return,
                avg_volatility: summary.avg_volatility,
                total_volume: summary.total_volume,
                highest_price: summary.highest_price,
                lowest_price: summary.lowest_price,
                trading_days: summary.trading_days,
                win_rate: Decimal::from(winning_days as u64 * 100)
                    / Decimal::from(summary.trading_days as u64),
            }
        })
        .collect()
}
