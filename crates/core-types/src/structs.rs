use crate::enums::{HeatmapColor, PriceDirection, VolumeLevel};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day as delivered by the market-data provider.
///
/// Immutable once received. The provider is trusted as-is: no adjustment for
/// splits or halts is attempted anywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Historical payloads wrapped as `{symbol, historical}` omit the symbol
    /// on each row; the client fills it in afterwards.
    #[serde(default)]
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(deserialize_with = "deserialize_volume")]
    pub volume: u64,
    #[serde(default)]
    pub change: Decimal,
    #[serde(default)]
    pub change_percent: Decimal,
    #[serde(default)]
    pub vwap: Decimal,
}

/// A `RawRecord` plus everything derived from it relative to its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    pub volume_level: VolumeLevel,
    /// 0-100, relative to the fetched window only.
    pub volume_percentile: Decimal,
    pub price_direction: PriceDirection,
    /// Intraday range as a percentage of the open.
    pub volatility: Decimal,
    pub volume_heatmap_color: HeatmapColor,
    /// Min-max normalised volume in `[0, 1]`.
    pub volume_intensity: Decimal,
}

impl EnhancedRecord {
    pub fn date(&self) -> NaiveDate {
        self.raw.date
    }
}

// Some provider responses encode volume as `68488300.0`.
fn deserialize_volume<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Volume {
        Integer(u64),
        Float(f64),
    }

    match Volume::deserialize(deserializer)? {
        Volume::Integer(v) => Ok(v),
        Volume::Float(v) if v.is_finite() && v >= 0.0 => Ok(v.round() as u64),
        Volume::Float(v) => Err(D::Error::custom(format!("invalid volume: {v}"))),
    }
}
