use crate::report::DailyMetric;
use core_types::EnhancedRecord;
use rust_decimal::Decimal;

/// Look-back, in price changes, of the relative strength index.
pub const RSI_PERIOD: usize = 14;
/// Sessions in the simple moving average of the close.
pub const MOVING_AVERAGE_PERIOD: usize = 20;

/// Builds the per-session series: return, RSI and moving average.
///
/// Input order does not matter; the series comes back sorted by date.
pub fn calculate_daily_metrics(records: &[EnhancedRecord]) -> Vec<DailyMetric> {
    let sorted = sorted_by_date(records);
    daily_metrics_from_sorted(&sorted)
}

pub(crate) fn sorted_by_date(records: &[EnhancedRecord]) -> Vec<&EnhancedRecord> {
    let mut sorted: Vec<&EnhancedRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.raw.date);
    sorted
}

pub(crate) fn daily_metrics_from_sorted(sorted: &[&EnhancedRecord]) -> Vec<DailyMetric> {
    let closes: Vec<Decimal> = sorted.iter().map(|r| r.raw.close).collect();

    sorted
        .iter()
        .enumerate()
        .map(|(index, record)| DailyMetric {
            date: record.raw.date,
            daily_return: if index == 0 {
                Decimal::ZERO
            } else {
                percent_change(closes[index - 1], closes[index])
            },
            volatility: record.volatility,
            volume: record.raw.volume,
            rsi: relative_strength_index(&closes, index, RSI_PERIOD),
            moving_avg: simple_moving_average(&closes, index, MOVING_AVERAGE_PERIOD),
        })
        .collect()
}

/// `(to - from) / from * 100`, or zero when `from` is zero.
pub(crate) fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        return Decimal::ZERO;
    }
    (to - from) / from * Decimal::ONE_HUNDRED
}

/// Mean of the `period` closes ending at `index`, inclusive.
fn simple_moving_average(closes: &[Decimal], index: usize, period: usize) -> Option<Decimal> {
    if period == 0 || index + 1 < period {
        return None;
    }
    let window = &closes[index + 1 - period..=index];
    Some(window.iter().sum::<Decimal>() / Decimal::from(period as u64))
}

/// RSI over the `period` close-to-close changes ending at `index`.
///
/// Gains and losses are both averaged over the full period, not over the
/// number of up or down sessions. No losses at all pins the index at 100.
fn relative_strength_index(closes: &[Decimal], index: usize, period: usize) -> Option<Decimal> {
    if period == 0 || index < period {
        return None;
    }

    let (gains, losses) = closes[index - period..=index].windows(2).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(gains, losses), pair| {
            let change = pair[1] - pair[0];
            if change > Decimal::ZERO {
                (gains + change, losses)
            } else {
                (gains, losses + change.abs())
            }
        },
    );

    let period = Decimal::from(period as u64);
    let avg_gain = gains / period;
    let avg_loss = losses / period;

    if avg_loss.is_zero() {
        return Some(Decimal::ONE_HUNDRED);
    }

    let rs = avg_gain / avg_loss;
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::enhance_financial_data;
    use chrono::{Days, NaiveDate};
    use core_types::RawRecord;
    use rust_decimal_macros::dec;

    fn series(closes: &[Decimal]) -> Vec<EnhancedRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let raw: Vec<RawRecord> = closes
            .iter()
            .enumerate()
            .map(|(i, close)| RawRecord {
                symbol: "TEST".to_string(),
                date: start + Days::new(i as u64),
                open: *close,
                high: *close + dec!(1),
                low: *close - dec!(1),
                close: *close,
                volume: 1000 + i as u64,
                ..Default::default()
            })
            .collect();
        enhance_financial_data(&raw)
    }

    #[test]
    fn empty_input() {
        assert!(calculate_daily_metrics(&[]).is_empty());
    }

    #[test]
    fn first_day_return_is_zero_and_rest_are_percent_changes() {
        let records = series(&[dec!(100), dec!(110), dec!(99)]);
        let daily = calculate_daily_metrics(&records);

        assert_eq!(daily[0].daily_return, Decimal::ZERO);
        assert_eq!(daily[1].daily_return, dec!(10));
        assert_eq!(daily[2].daily_return, dec!(-10));
        assert!(daily.iter().all(|d| d.rsi.is_none() && d.moving_avg.is_none()));
    }

    #[test]
    fn sorts_before_computing() {
        let mut records = series(&[dec!(100), dec!(110), dec!(99)]);
        records.reverse();
        let daily = calculate_daily_metrics(&records);

        let dates: Vec<_> = daily.iter().map(|d| d.date).collect();
        let mut expected = dates.clone();
        expected.sort();
        assert_eq!(dates, expected);
        assert_eq!(daily[1].daily_return, dec!(10));
    }

    #[test]
    fn moving_average_starts_at_the_twentieth_session() {
        let closes: Vec<Decimal> = (1..=21i64).map(Decimal::from).collect();
        let daily = calculate_daily_metrics(&series(&closes));

        assert!(daily[18].moving_avg.is_none());
        // Mean of 1..=20 and 2..=21.
        assert_eq!(daily[19].moving_avg, Some(dec!(10.5)));
        assert_eq!(daily[20].moving_avg, Some(dec!(11.5)));
    }

    #[test]
    fn rsi_uses_fixed_period_averages() {
        // Alternating +2 / -1 moves: 7 gains of 2 and 7 losses of 1 over the first 14 changes.
        let mut closes = vec![dec!(100)];
        for i in 0..15 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + dec!(2) } else { last - dec!(1) });
        }
        let daily = calculate_daily_metrics(&series(&closes));

        assert!(daily[13].rsi.is_none());
        // avg gain 14/14 = 1, avg loss 7/14 = 0.5, RS = 2, RSI = 100 - 100/3.
        let rsi = daily[14].rsi.unwrap();
        assert_eq!(rsi.round_dp(6), dec!(66.666667));
    }

    #[test]
    fn rsi_is_100_without_losses() {
        let closes: Vec<Decimal> = (0..15i64).map(|i| dec!(50) + Decimal::from(i)).collect();
        let daily = calculate_daily_metrics(&series(&closes));
        assert_eq!(daily[14].rsi, Some(dec!(100)));
    }

    #[test]
    fn flat_changes_count_as_zero_losses() {
        let closes = vec![dec!(100); 15];
        let daily = calculate_daily_metrics(&series(&closes));
        assert_eq!(daily[14].rsi, Some(dec!(100)));
    }
}
