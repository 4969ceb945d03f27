use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Field names follow the provider's camelCase payloads.

/// One fiscal period of consensus analyst estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystEstimate {
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub revenue_low: Decimal,
    #[serde(default)]
    pub revenue_high: Decimal,
    #[serde(default)]
    pub revenue_avg: Decimal,
    #[serde(default)]
    pub ebitda_low: Decimal,
    #[serde(default)]
    pub ebitda_high: Decimal,
    #[serde(default)]
    pub ebitda_avg: Decimal,
    #[serde(default)]
    pub net_income_low: Decimal,
    #[serde(default)]
    pub net_income_high: Decimal,
    #[serde(default)]
    pub net_income_avg: Decimal,
    #[serde(default)]
    pub eps_avg: Decimal,
    #[serde(default)]
    pub eps_high: Decimal,
    #[serde(default)]
    pub eps_low: Decimal,
    #[serde(default)]
    pub num_analysts_revenue: u32,
    #[serde(default)]
    pub num_analysts_eps: u32,
}

/// A letter-grade company rating with its component scores (each 1-5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRating {
    pub symbol: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub rating: String,
    #[serde(default)]
    pub overall_score: i32,
    #[serde(default)]
    pub discounted_cash_flow_score: i32,
    #[serde(default)]
    pub return_on_equity_score: i32,
    #[serde(default)]
    pub return_on_assets_score: i32,
    #[serde(default)]
    pub debt_to_equity_score: i32,
    #[serde(default)]
    pub price_to_earnings_score: i32,
    #[serde(default)]
    pub price_to_book_score: i32,
}

/// Analyst price-target consensus and the distribution of recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTarget {
    pub symbol: String,
    pub target_high: Decimal,
    pub target_low: Decimal,
    pub target_consensus: Decimal,
    pub target_median: Decimal,
    #[serde(default)]
    pub analyst_ratings_strong_buy: u32,
    #[serde(default)]
    pub analyst_ratings_buy: u32,
    #[serde(default)]
    pub analyst_ratings_hold: u32,
    #[serde(default)]
    pub analyst_ratings_sell: u32,
    #[serde(default)]
    pub analyst_ratings_strong_sell: u32,
}

impl PriceTarget {
    /// Upside of the consensus target over `price`, in percent.
    pub fn consensus_upside_pct(&self, price: Decimal) -> Option<Decimal> {
        if price <= Decimal::ZERO {
            return None;
        }
        Some((self.target_consensus - price) / price * Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deserializes_rating_snapshot() {
        let json = r#"{
            "symbol": "AAPL",
            "rating": "A-",
            "overallScore": 4,
            "discountedCashFlowScore": 3,
            "returnOnEquityScore": 5,
            "returnOnAssetsScore": 5,
            "debtToEquityScore": 4,
            "priceToEarningsScore": 2,
            "priceToBookScore": 1
        }"#;
        let rating: CompanyRating = serde_json::from_str(json).unwrap();
        assert_eq!(rating.rating, "A-");
        assert_eq!(rating.date, None);
        assert_eq!(rating.return_on_equity_score, 5);
    }

    #[test]
    fn consensus_upside() {
        let target = PriceTarget {
            symbol: "AAPL".to_string(),
            target_high: dec!(300),
            target_low: dec!(150),
            target_consensus: dec!(220),
            target_median: dec!(225),
            analyst_ratings_strong_buy: 0,
            analyst_ratings_buy: 0,
            analyst_ratings_hold: 0,
            analyst_ratings_sell: 0,
            analyst_ratings_strong_sell: 0,
        };
        assert_eq!(target.consensus_upside_pct(dec!(200)), Some(dec!(10)));
        assert_eq!(target.consensus_upside_pct(Decimal::ZERO), None);
    }
}
