//! Percentile ranking and the categorical buckets derived from it.

use core_types::{HeatmapColor, PriceDirection, RawRecord, VolumeLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const LOW_VOLUME_CEILING: Decimal = dec!(33);
const MEDIUM_VOLUME_CEILING: Decimal = dec!(66);

/// Percentile cut-offs for the five heatmap buckets, each inclusive.
const HEATMAP_THRESHOLDS: [(Decimal, HeatmapColor); 4] = [
    (dec!(20), HeatmapColor::PaleGreen),
    (dec!(40), HeatmapColor::Green),
    (dec!(60), HeatmapColor::Yellow),
    (dec!(80), HeatmapColor::Orange),
];

/// Moves smaller than this (in percent, either way) count as flat.
const FLAT_BAND_PCT: Decimal = dec!(0.1);

/// Ranks `target` within `values`.
///
/// The result is the index of the first value `>= target` in the ascending
/// sort, as a percentage of the number of values. Duplicates all share the
/// rank of their first position, so the largest value never reaches 100.
///
/// An empty slice ranks everything at 0, and a target above every value
/// ranks at 100.
pub fn calculate_percentile<T: Ord + Copy>(values: &[T], target: T) -> Decimal {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    percentile_in_sorted(&sorted, target)
}

/// Same as [`calculate_percentile`] for a slice that is already sorted.
pub(crate) fn percentile_in_sorted<T: Ord + Copy>(sorted: &[T], target: T) -> Decimal {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    let index = sorted.partition_point(|value| *value < target);
    Decimal::from(index as u64 * 100) / Decimal::from(sorted.len() as u64)
}

pub fn volume_level(percentile: Decimal) -> VolumeLevel {
    if percentile <= LOW_VOLUME_CEILING {
        VolumeLevel::Low
    } else if percentile <= MEDIUM_VOLUME_CEILING {
        VolumeLevel::Medium
    } else {
        VolumeLevel::High
    }
}

pub fn heatmap_color(percentile: Decimal) -> HeatmapColor {
    HEATMAP_THRESHOLDS
        .iter()
        .find(|(ceiling, _)| percentile <= *ceiling)
        .map(|(_, color)| *color)
        .unwrap_or(HeatmapColor::Red)
}

pub fn price_direction(change_percent: Decimal) -> PriceDirection {
    if change_percent.abs() < FLAT_BAND_PCT {
        PriceDirection::Flat
    } else if change_percent.is_sign_positive() {
        PriceDirection::Up
    } else {
        PriceDirection::Down
    }
}

/// Intraday range as a percentage of the open: `(high - low) / open * 100`.
///
/// A non-positive open has no meaningful range; it yields zero.
pub fn calculate_volatility(record: &RawRecord) -> Decimal {
    if record.open <= Decimal::ZERO {
        tracing::warn!(
            symbol = %record.symbol,
            date = %record.date,
            open = %record.open,
            "Non-positive open price, reporting zero volatility."
        );
        return Decimal::ZERO;
    }
    (record.high - record.low) / record.open * Decimal::ONE_HUNDRED
}
