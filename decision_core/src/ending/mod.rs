//! Ending classification - a pure mapping from final state to outcome.

use economy_rules::{Indicator, IndicatorState};
use serde::{Deserialize, Serialize};

/// Outcome categories for a finished session.
///
/// Serialized lowercase; renderers use the category directly as a style
/// class on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeCategory {
    Good,
    Warn,
    Bad,
}

impl OutcomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Good => "good",
            OutcomeCategory::Warn => "warn",
            OutcomeCategory::Bad => "bad",
        }
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified ending: the category plus the headline and assessment shown
/// on the results screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ending {
    pub category: OutcomeCategory,
    pub title: String,
    pub detail: String,
}

impl Ending {
    fn new(category: OutcomeCategory, title: &str, detail: &str) -> Self {
        Self {
            category,
            title: title.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Classify a final indicator state into an ending.
///
/// Rules are evaluated top to bottom and the first match wins. The
/// categories overlap, so the order is part of the contract:
///
/// 1. Runaway inflation or collapsed confidence
/// 2. Low inflation bought with high unemployment
/// 3. Low inflation, solid confidence, contained deficit, healthy reserves
/// 4. Everything else
///
/// Deterministic and stateless: identical input always yields the identical
/// ending.
pub fn classify(state: &IndicatorState) -> Ending {
    let inflation = state.get(Indicator::Inflation);
    let unemployment = state.get(Indicator::Unemployment);
    let deficit = state.get(Indicator::Deficit);
    let confidence = state.get(Indicator::Confidence);
    let reserves = state.get(Indicator::Reserves);

    if inflation >= 80 || confidence <= 15 {
        return Ending::new(
            OutcomeCategory::Bad,
            "Hyperinflation and social chaos",
            "The nominal anchors were lost and confidence collapsed. Deep reforms are required.",
        );
    }

    if inflation <= 15 && unemployment >= 12 {
        return Ending::new(
            OutcomeCategory::Warn,
            "Controlled recession",
            "Inflation is low, but unemployment is high. Prioritise reactivation policies.",
        );
    }

    if inflation <= 25 && confidence >= 55 && deficit <= 3 && reserves >= 50 {
        return Ending::new(
            OutcomeCategory::Good,
            "Slow but sustained recovery",
            "Moderate inflation, rising confidence and contained public accounts. Gradual adjustment is working.",
        );
    }

    Ending::new(
        OutcomeCategory::Warn,
        "Stagnation with stability",
        "Prices are contained but growth is weak. Productivity and investment are needed.",
    )
}
