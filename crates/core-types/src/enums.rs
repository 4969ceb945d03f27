use serde::{Deserialize, Serialize};
use std::fmt;

/// How a day's traded volume ranks within the loaded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for VolumeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VolumeLevel::Low => "low",
            VolumeLevel::Medium => "medium",
            VolumeLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// The direction a day's price moved, with a small dead band around zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

impl PriceDirection {
    /// A single glyph for compact terminal output.
    pub fn arrow(&self) -> &'static str {
        match self {
            PriceDirection::Up => "▲",
            PriceDirection::Down => "▼",
            PriceDirection::Flat => "■",
        }
    }
}

impl fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PriceDirection::Up => "up",
            PriceDirection::Down => "down",
            PriceDirection::Flat => "flat",
        };
        f.write_str(label)
    }
}

/// Five ordinal heatmap buckets, from the quietest to the busiest volume.
///
/// The variants are ordered, so `HeatmapColor::Red > HeatmapColor::PaleGreen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeatmapColor {
    PaleGreen,
    Green,
    Yellow,
    Orange,
    Red,
}

impl HeatmapColor {
    /// The utility class the calendar front end paints the day cell with.
    pub fn css_class(&self) -> &'static str {
        match self {
            HeatmapColor::PaleGreen => "bg-green-100",
            HeatmapColor::Green => "bg-green-200",
            HeatmapColor::Yellow => "bg-yellow-200",
            HeatmapColor::Orange => "bg-orange-300",
            HeatmapColor::Red => "bg-red-400",
        }
    }

    /// Zero-based position on the scale, useful for shading in a terminal.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

/// The four independent provider endpoints a dashboard load talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    HistoricalData,
    AnalystEstimates,
    CompanyRating,
    PriceTargets,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::HistoricalData,
        Endpoint::AnalystEstimates,
        Endpoint::CompanyRating,
        Endpoint::PriceTargets,
    ];
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Endpoint::HistoricalData => "historical data",
            Endpoint::AnalystEstimates => "analyst estimates",
            Endpoint::CompanyRating => "company rating",
            Endpoint::PriceTargets => "price targets",
        };
        f.write_str(label)
    }
}
