//! View models handed to the presentation layer.
//!
//! The core never renders. These types carry exactly what a renderer needs
//! (titles, labels, formatted readings, the decision log) and serialize to
//! JSON for DOM or GUI embedders.

use economy_rules::{Indicator, IndicatorState, Node};
use serde::{Deserialize, Serialize};

use crate::ending::{Ending, OutcomeCategory};

/// Read-only snapshot of a node for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub key: String,
    pub title: String,
    pub narrative: String,
    pub concepts: Vec<String>,

    /// Labels of the selectable choices, in offer order. Selection is by
    /// index into this list.
    pub choices: Vec<String>,
}

impl SceneView {
    /// Build the rendering view of a node.
    pub fn of(node: &Node) -> Self {
        Self {
            key: node.key.to_string(),
            title: node.title.clone(),
            narrative: node.narrative.clone(),
            concepts: node.concepts.clone(),
            choices: node.choices.iter().map(|c| c.label.clone()).collect(),
        }
    }

    /// JSON hand-off for embedding renderers.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// One rendered indicator reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub indicator: Indicator,
    pub label: String,
    pub value: i32,

    /// Value with its unit suffix, ready for display ("35%", "60").
    pub display: String,
}

/// Snapshot of the numeric vector and the decision log for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorsView {
    /// Readings in display order.
    pub readings: Vec<IndicatorReading>,

    /// The decision log, oldest entry first.
    pub log: Vec<String>,
}

impl IndicatorsView {
    /// Snapshot the live state.
    pub fn of(state: &IndicatorState) -> Self {
        let readings = Indicator::ALL
            .iter()
            .map(|&indicator| {
                let value = state.get(indicator);
                IndicatorReading {
                    indicator,
                    label: indicator.label().to_string(),
                    value,
                    display: format!("{}{}", value, indicator.unit_suffix()),
                }
            })
            .collect();

        Self {
            readings,
            log: state.log().to_vec(),
        }
    }

    /// One-line trajectory summary for the results screen.
    pub fn summary(&self) -> String {
        self.readings
            .iter()
            .map(|reading| format!("{} {}", reading.label, reading.display))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// JSON hand-off for embedding renderers.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// The results screen payload for a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingReport {
    pub category: OutcomeCategory,
    pub title: String,
    pub detail: String,
    pub final_indicators: IndicatorsView,
}

impl EndingReport {
    /// Combine a classified ending with the final state snapshot.
    pub fn new(ending: Ending, state: &IndicatorState) -> Self {
        Self {
            category: ending.category,
            title: ending.title,
            detail: ending.detail,
            final_indicators: IndicatorsView::of(state),
        }
    }

    /// One-line trajectory summary, shown under the ending text.
    pub fn trajectory(&self) -> String {
        self.final_indicators.summary()
    }

    /// JSON hand-off for embedding renderers.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
