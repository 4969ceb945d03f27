use crate::enums::Endpoint;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The outcome of a single endpoint within one dashboard load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Pending,
    Success,
    #[serde(rename = "error")]
    Failed { message: String },
}

impl FetchStatus {
    pub fn from_result<T, E: Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => FetchStatus::Success,
            Err(e) => FetchStatus::Failed {
                message: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchStatus::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchStatus::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Per-endpoint statuses for one load, joined into a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchReport {
    pub historical_data: FetchStatus,
    pub analyst_estimates: FetchStatus,
    pub company_rating: FetchStatus,
    pub price_targets: FetchStatus,
}

impl FetchReport {
    /// A report with every endpoint still pending.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: Endpoint) -> &FetchStatus {
        match endpoint {
            Endpoint::HistoricalData => &self.historical_data,
            Endpoint::AnalystEstimates => &self.analyst_estimates,
            Endpoint::CompanyRating => &self.company_rating,
            Endpoint::PriceTargets => &self.price_targets,
        }
    }

    pub fn set(&mut self, endpoint: Endpoint, status: FetchStatus) {
        let slot = match endpoint {
            Endpoint::HistoricalData => &mut self.historical_data,
            Endpoint::AnalystEstimates => &mut self.analyst_estimates,
            Endpoint::CompanyRating => &mut self.company_rating,
            Endpoint::PriceTargets => &mut self.price_targets,
        };
        *slot = status;
    }

    /// Number of endpoints that succeeded.
    pub fn completed_calls(&self) -> usize {
        Endpoint::ALL
            .iter()
            .filter(|endpoint| self.get(**endpoint).is_success())
            .count()
    }

    /// Endpoints that failed, with their messages.
    pub fn failures(&self) -> Vec<(Endpoint, &str)> {
        Endpoint::ALL
            .iter()
            .filter_map(|endpoint| {
                self.get(*endpoint)
                    .error_message()
                    .map(|message| (*endpoint, message))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_each_endpoint_independently() {
        let mut report = FetchReport::new();
        assert_eq!(report.completed_calls(), 0);

        report.set(Endpoint::HistoricalData, FetchStatus::Success);
        report.set(
            Endpoint::CompanyRating,
            FetchStatus::from_result::<(), _>(&Err("rate limited")),
        );
        report.set(Endpoint::PriceTargets, FetchStatus::Success);

        assert_eq!(report.completed_calls(), 2);
        assert_eq!(report.failures(), vec![(Endpoint::CompanyRating, "rate limited")]);
        assert_eq!(report.get(Endpoint::AnalystEstimates), &FetchStatus::Pending);
    }

    #[test]
    fn serializes_as_tagged_status() {
        let failed = FetchStatus::Failed {
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");

        let success = serde_json::to_value(FetchStatus::Success).unwrap();
        assert_eq!(success["status"], "success");
    }
}
