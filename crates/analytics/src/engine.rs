use crate::daily::{daily_metrics_from_sorted, percent_change, sorted_by_date};
use crate::enhance::enhance_financial_data;
use crate::error::AnalyticsError;
use crate::periods::{calculate_monthly_metrics, calculate_weekly_metrics};
use crate::report::{DailyMetric, DateRange, DayReturn, MarketReport, PriceRange, TradingStats};
use core_types::{EnhancedRecord, RawRecord};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Sessions per year used to annualise the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A stateless calculator for deriving market metrics from daily records.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the whole pipeline over a freshly fetched window.
    ///
    /// Raw records are enhanced first, then every derived series and the
    /// summary statistics are computed from the enhanced set.
    pub fn analyze(&self, raw: &[RawRecord]) -> Result<MarketReport, AnalyticsError> {
        let records = enhance_financial_data(raw);
        self.report_for(records)
    }

    /// Builds the report for records that were enhanced earlier, e.g. ones
    /// restored from the snapshot cache.
    pub fn report_for(&self, records: Vec<EnhancedRecord>) -> Result<MarketReport, AnalyticsError> {
        let sorted = sorted_by_date(&records);
        let daily = daily_metrics_from_sorted(&sorted);
        let stats = self.stats_from(&sorted, &daily)?;
        let weekly = calculate_weekly_metrics(&records);
        let monthly = calculate_monthly_metrics(&records);

        tracing::debug!(
            records = records.len(),
            weeks = weekly.len(),
            months = monthly.len(),
            "Market report assembled."
        );

        Ok(MarketReport {
            records,
            daily,
            weekly,
            monthly,
            stats,
        })
    }

    /// Whole-window summary statistics.
    ///
    /// # Arguments
    ///
    /// * `records` - The enhanced records of one window, in any order.
    ///
    /// # Returns
    ///
    /// A zeroed `TradingStats` for an empty slice, otherwise the computed
    /// statistics, or an `AnalyticsError` if a square root cannot be taken.
    pub fn trading_stats(&self, records: &[EnhancedRecord]) -> Result<TradingStats, AnalyticsError> {
        let sorted = sorted_by_date(records);
        let daily = daily_metrics_from_sorted(&sorted);
        self.stats_from(&sorted, &daily)
    }

    fn stats_from(
        &self,
        sorted: &[&EnhancedRecord],
        daily: &[DailyMetric],
    ) -> Result<TradingStats, AnalyticsError> {
        let mut stats = TradingStats::new();

        if sorted.is_empty() {
            // No sessions: every figure stays at its zeroed default.
            return Ok(stats);
        }

        self.calculate_volume_and_range(sorted, &mut stats);
        self.calculate_returns(sorted, daily, &mut stats);
        self.calculate_risk(daily, &mut stats)?;
        self.calculate_drawdown(daily, &mut stats);
        self.calculate_day_extremes(daily, &mut stats);

        Ok(stats)
    }

    /// Session count, date range, volume totals and the price envelope.
    fn calculate_volume_and_range(&self, sorted: &[&EnhancedRecord], stats: &mut TradingStats) {
        let first = sorted[0];
        let last = sorted[sorted.len() - 1];

        stats.total_trading_days = sorted.len();
        stats.date_range = DateRange {
            start: Some(first.raw.date),
            end: Some(last.raw.date),
        };
        stats.total_volume = sorted.iter().map(|r| r.raw.volume).sum();
        stats.avg_daily_volume =
            Decimal::from(stats.total_volume) / Decimal::from(sorted.len() as u64);
        stats.price_range = PriceRange {
            min: sorted.iter().map(|r| r.raw.low).fold(first.raw.low, Decimal::min),
            max: sorted.iter().map(|r| r.raw.high).fold(first.raw.high, Decimal::max),
        };
    }

    /// Total return over the window, mean daily return and win rate.
    fn calculate_returns(
        &self,
        sorted: &[&EnhancedRecord],
        daily: &[DailyMetric],
        stats: &mut TradingStats,
    ) {
        let first = sorted[0];
        let last = sorted[sorted.len() - 1];
        let sessions = Decimal::from(daily.len() as u64);

        stats.total_return = percent_change(first.raw.close, last.raw.close);

        // The first session's return is a forced zero and still counts here.
        let return_sum: Decimal = daily.iter().map(|d| d.daily_return).sum();
        stats.avg_daily_return = return_sum / sessions;

        let winning_days = daily
            .iter()
            .filter(|d| d.daily_return > Decimal::ZERO)
            .count();
        stats.win_rate = Decimal::from(winning_days as u64 * 100) / sessions;
    }

    /// Population volatility of daily returns and the annualised Sharpe ratio.
    fn calculate_risk(&self, daily: &[DailyMetric], stats: &mut TradingStats) -> Result<(), AnalyticsError> {
        let mean = stats.avg_daily_return;
        let variance: Decimal = daily
            .iter()
            .map(|d| (d.daily_return - mean) * (d.daily_return - mean))
            .sum::<Decimal>()
            / Decimal::from(daily.len() as u64);

        stats.volatility = variance.sqrt().ok_or_else(|| {
            AnalyticsError::InternalError("Failed to calculate square root for variance".to_string())
        })?;

        let annualization = Decimal::from(TRADING_DAYS_PER_YEAR).sqrt().ok_or_else(|| {
            AnalyticsError::InternalError("Failed to calculate annualization factor".to_string())
        })?;

        // Zero volatility falls back to a divisor of one; the ratio is then
        // just the scaled mean return.
        let divisor = if stats.volatility.is_zero() {
            tracing::debug!("Zero volatility, Sharpe ratio uses a unit divisor.");
            Decimal::ONE
        } else {
            stats.volatility
        };
        stats.sharpe_ratio = mean / divisor * annualization;

        Ok(())
    }

    /// Maximum drawdown of the running sum of daily percent returns.
    fn calculate_drawdown(&self, daily: &[DailyMetric], stats: &mut TradingStats) {
        let mut cumulative = Decimal::ZERO;
        let mut peak: Option<Decimal> = None;
        let mut max_drawdown = Decimal::ZERO;

        for day in daily {
            cumulative += day.daily_return;
            let running_peak = match peak {
                Some(p) if p >= cumulative => p,
                _ => cumulative,
            };
            peak = Some(running_peak);

            let drawdown = running_peak - cumulative;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }

        stats.max_drawdown = max_drawdown;
    }

    /// Best and worst sessions; the earliest one wins a tie.
    fn calculate_day_extremes(&self, daily: &[DailyMetric], stats: &mut TradingStats) {
        let Some(first) = daily.first() else {
            return;
        };

        let mut best = first;
        let mut worst = first;
        for day in &daily[1..] {
            if day.daily_return > best.daily_return {
                best = day;
            }
            if day.daily_return < worst.daily_return {
                worst = day;
            }
        }

        stats.best_day = DayReturn {
            date: Some(best.date),
            daily_return: best.daily_return,
        };
        stats.worst_day = DayReturn {
            date: Some(worst.date),
            daily_return: worst.daily_return,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn window(closes: &[Decimal]) -> Vec<RawRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| RawRecord {
                symbol: "TEST".to_string(),
                date: start + Days::new(i as u64),
                open: *close,
                high: *close + dec!(1),
                low: *close - dec!(1),
                close: *close,
                volume: 100 * (i as u64 + 1),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn empty_window_gives_zeroed_stats() {
        let engine = AnalyticsEngine::new();
        let stats = engine.trading_stats(&[]).unwrap();
        assert_eq!(stats, TradingStats::default());
        assert_eq!(stats.date_range.start, None);
        assert_eq!(stats.best_day.date, None);
    }

    #[test]
    fn returns_drawdown_and_extremes() {
        let engine = AnalyticsEngine::new();
        // Returns: 0, +10, -10, +10 (percent).
        let raw = window(&[dec!(100), dec!(110), dec!(99), dec!(108.9)]);
        let report = engine.analyze(&raw).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.total_trading_days, 4);
        assert_eq!(stats.total_volume, 1000);
        assert_eq!(stats.avg_daily_volume, dec!(250));
        assert_eq!(stats.price_range.min, dec!(98));
        assert_eq!(stats.price_range.max, dec!(111));
        assert_eq!(stats.total_return, dec!(8.9));
        assert_eq!(stats.avg_daily_return, dec!(2.5));
        assert_eq!(stats.win_rate, dec!(50));

        // Cumulative sums 0, 10, 0, 10: peak 10, trough 0.
        assert_eq!(stats.max_drawdown, dec!(10));

        assert_eq!(stats.best_day.daily_return, dec!(10));
        assert_eq!(stats.best_day.date, NaiveDate::from_ymd_opt(2024, 2, 2));
        assert_eq!(stats.worst_day.daily_return, dec!(-10));
        assert_eq!(stats.worst_day.date, NaiveDate::from_ymd_opt(2024, 2, 3));
    }

    #[test]
    fn volatility_is_population_standard_deviation() {
        let engine = AnalyticsEngine::new();
        let raw = window(&[dec!(100), dec!(110), dec!(99), dec!(108.9)]);
        let stats = engine.analyze(&raw).unwrap().stats;

        // Deviations from 2.5: -2.5, 7.5, -12.5, 7.5 -> variance 68.75.
        let expected = dec!(68.75).sqrt().unwrap();
        assert_eq!(stats.volatility, expected);

        let sharpe = dec!(2.5) / expected * Decimal::from(252).sqrt().unwrap();
        assert_eq!(stats.sharpe_ratio, sharpe);
    }

    #[test]
    fn report_series_share_one_window() {
        let engine = AnalyticsEngine::new();
        let raw = window(&[dec!(10), dec!(11), dec!(12)]);
        let report = engine.analyze(&raw).unwrap();

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.daily.len(), 3);
        assert_eq!(report.weekly.len(), 1);
        assert_eq!(report.monthly.len(), 1);
        assert_eq!(report.monthly[0].month, "February");
    }
}
