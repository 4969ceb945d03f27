use analytics::classify::{calculate_volatility, price_direction, volume_level};
use analytics::{
    calculate_daily_metrics, calculate_monthly_metrics, calculate_weekly_metrics,
    enhance_financial_data, AnalyticsEngine,
};
use chrono::{Days, NaiveDate};
use core_types::{PriceDirection, RawRecord, VolumeLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn consecutive_days(start: NaiveDate, closes: &[Decimal]) -> Vec<RawRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| RawRecord {
            symbol: "ACME".to_string(),
            date: start + Days::new(i as u64),
            open: *close,
            high: *close + dec!(0.5),
            low: *close - dec!(0.5),
            close: *close,
            volume: 10_000 + 250 * i as u64,
            ..Default::default()
        })
        .collect()
}

#[test]
fn constant_price_window_hits_every_zero_path() {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let raw = consecutive_days(start, &[dec!(100); 21]);
    let report = AnalyticsEngine::new().analyze(&raw).unwrap();

    assert!(report.daily.iter().all(|d| d.daily_return.is_zero()));
    assert_eq!(report.daily[20].moving_avg, Some(dec!(100)));

    let stats = &report.stats;
    assert_eq!(stats.total_trading_days, 21);
    assert_eq!(stats.volatility, Decimal::ZERO);
    // Zero mean over a unit divisor.
    assert_eq!(stats.sharpe_ratio, Decimal::ZERO);
    assert_eq!(stats.max_drawdown, Decimal::ZERO);
    assert_eq!(stats.win_rate, Decimal::ZERO);
    assert_eq!(stats.total_return, Decimal::ZERO);
}

#[test]
fn single_day_window() {
    let raw = vec![RawRecord {
        symbol: "ACME".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        open: dec!(10),
        high: dec!(12),
        low: dec!(8),
        close: dec!(11),
        volume: 1000,
        change_percent: dec!(5),
        ..Default::default()
    }];

    assert_eq!(calculate_volatility(&raw[0]), dec!(40));
    assert_eq!(price_direction(dec!(5)), PriceDirection::Up);

    let enhanced = enhance_financial_data(&raw);
    let daily = calculate_daily_metrics(&enhanced);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].rsi, None);
    assert_eq!(daily[0].moving_avg, None);
    assert_eq!(daily[0].volatility, dec!(40));

    let stats = AnalyticsEngine::new().trading_stats(&enhanced).unwrap();
    assert_eq!(stats.total_trading_days, 1);
    assert_eq!(stats.best_day.date, stats.worst_day.date);
}

#[test]
fn volume_level_boundaries_are_exact() {
    assert_eq!(volume_level(dec!(33)), VolumeLevel::Low);
    assert_eq!(volume_level(dec!(34)), VolumeLevel::Medium);
    assert_eq!(volume_level(dec!(67)), VolumeLevel::High);
}

#[test]
fn weekly_buckets_roll_while_monthly_buckets_follow_the_calendar() {
    let closes: Vec<Decimal> = (0..10i64).map(|i| dec!(50) + Decimal::from(i)).collect();

    let ten_days = consecutive_days(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), &closes);
    let weeks = calculate_weekly_metrics(&enhance_financial_data(&ten_days));
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].trading_days, 7);
    assert_eq!(weeks[1].trading_days, 3);

    let across_month_end =
        consecutive_days(NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(), &closes[..4]);
    let months = calculate_monthly_metrics(&enhance_financial_data(&across_month_end));
    assert_eq!(months.len(), 2);
    assert_eq!((months[0].month.as_str(), months[0].trading_days), ("January", 2));
    assert_eq!((months[1].month.as_str(), months[1].trading_days), ("February", 2));
}

#[test]
fn empty_window_is_not_an_error() {
    let engine = AnalyticsEngine::new();
    let stats = engine.trading_stats(&[]).unwrap();
    assert_eq!(stats.total_trading_days, 0);
    assert_eq!(stats.date_range.start, None);
    assert_eq!(stats.date_range.end, None);
    assert_eq!(stats.sharpe_ratio, Decimal::ZERO);
    assert_eq!(stats.best_day.daily_return, Decimal::ZERO);

    let report = engine.analyze(&[]).unwrap();
    assert!(report.records.is_empty());
    assert!(report.daily.is_empty());
    assert!(report.weekly.is_empty());
    assert!(report.monthly.is_empty());
}

#[test]
fn enhancement_keeps_input_order_for_shuffled_windows() {
    let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    let mut raw = consecutive_days(start, &[dec!(20), dec!(21), dec!(19), dec!(22), dec!(18)]);
    raw.swap(0, 4);
    raw.swap(1, 3);

    let enhanced = enhance_financial_data(&raw);
    let input_dates: Vec<NaiveDate> = raw.iter().map(|r| r.date).collect();
    let output_dates: Vec<NaiveDate> = enhanced.iter().map(|r| r.date()).collect();
    assert_eq!(input_dates, output_dates);

    // The derived series are nonetheless chronological.
    let daily = calculate_daily_metrics(&enhanced);
    assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn report_serializes_with_front_end_field_names() {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let raw = consecutive_days(start, &[dec!(10), dec!(11)]);
    let report = AnalyticsEngine::new().analyze(&raw).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["daily"][0].get("return").is_some());
    assert!(json["daily"][0].get("rsi").is_none());
    assert!(json["stats"].get("sharpeRatio").is_some());
    assert!(json["weekly"][0].get("weekStart").is_some());
    assert!(json["monthly"][0].get("winRate").is_some());
}
