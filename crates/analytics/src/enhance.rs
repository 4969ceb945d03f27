use crate::classify::{
    calculate_volatility, heatmap_color, percentile_in_sorted, price_direction, volume_level,
};
use core_types::{EnhancedRecord, RawRecord};
use rust_decimal::Decimal;

/// Derives the per-day classification fields for a freshly fetched window.
///
/// Volume percentiles and intensities are relative to `raw` alone. The output
/// has the same length and order as the input; callers sort when they need a
/// time series.
pub fn enhance_financial_data(raw: &[RawRecord]) -> Vec<EnhancedRecord> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut sorted_volumes: Vec<u64> = raw.iter().map(|r| r.volume).collect();
    sorted_volumes.sort_unstable();
    let min_volume = sorted_volumes[0];
    let max_volume = sorted_volumes[sorted_volumes.len() - 1];
    let volume_span = Decimal::from(max_volume - min_volume);

    tracing::debug!(
        records = raw.len(),
        min_volume,
        max_volume,
        "Enhancing raw records."
    );

    raw.iter()
        .map(|record| {
            let volume_percentile = percentile_in_sorted(&sorted_volumes, record.volume);
            // A window where every day traded the same volume has no spread to normalise.
            let volume_intensity = if volume_span.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::from(record.volume - min_volume) / volume_span
            };

            EnhancedRecord {
                raw: record.clone(),
                volume_level: volume_level(volume_percentile),
                volume_percentile,
                price_direction: price_direction(record.change_percent),
                volatility: calculate_volatility(record),
                volume_heatmap_color: heatmap_color(volume_percentile),
                volume_intensity,
            }
        })
        .collect()
}
