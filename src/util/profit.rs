use serde::{Deserialize, Serialize};

/// Margin below this is flagged as low.
pub const GOOD_MARGIN_PERCENT: f64 = 35.0;
/// Margin at or above this is flagged as great.
pub const GREAT_MARGIN_PERCENT: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitTier {
    Neutral,
    Low,
    Good,
    Great,
}

impl ProfitTier {
    /// Bands: `(-inf, 0]` neutral, `(0, 35)` low, `[35, 45)` good, `[45, inf)` great.
    pub fn classify(margin_percent: f64) -> Self {
        if margin_percent >= GREAT_MARGIN_PERCENT {
            ProfitTier::Great
        } else if margin_percent >= GOOD_MARGIN_PERCENT {
            ProfitTier::Good
        } else if margin_percent > 0.0 {
            ProfitTier::Low
        } else {
            ProfitTier::Neutral
        }
    }

    pub fn advice(&self) -> Option<&'static str> {
        match self {
            ProfitTier::Neutral => None,
            ProfitTier::Low => Some("Margin is low - consider increasing markup"),
            ProfitTier::Good => Some("Healthy margin"),
            ProfitTier::Great => Some("Excellent margin on this job!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub material_cost: f64,
    pub labor_cost: f64,
    pub total_cost: f64,
    pub total: f64,
    pub profit: f64,
    pub margin_percent: f64,
    pub tier: ProfitTier,
    pub advice: Option<String>,
}

pub fn calculate_profit(material_cost: f64, labor_cost: f64, total: f64) -> ProfitBreakdown {
    let total_cost = material_cost + labor_cost;
    let profit = total - total_cost;
    let margin_percent = if total > 0.0 { profit / total * 100.0 } else { 0.0 };
    let tier = ProfitTier::classify(margin_percent);

    ProfitBreakdown {
        material_cost,
        labor_cost,
        total_cost,
        total,
        profit,
        margin_percent,
        tier,
        advice: tier.advice().map(str::to_string),
    }
}
