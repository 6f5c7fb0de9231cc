//! Economic indicators - the numeric vector steered by the player.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lower bound every indicator is clamped to.
pub const INDICATOR_MIN: i32 = 0;

/// Upper bound every indicator is clamped to.
pub const INDICATOR_MAX: i32 = 100;

/// The six economic indicators tracked during a session.
///
/// Serialized lowercase so authored effect tables key entries by the plain
/// indicator name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Inflation,
    Unemployment,
    Deficit,
    Confidence,
    Reserves,
    Energy,
}

impl Indicator {
    /// All indicators, in display order.
    pub const ALL: [Indicator; 6] = [
        Indicator::Inflation,
        Indicator::Unemployment,
        Indicator::Deficit,
        Indicator::Confidence,
        Indicator::Reserves,
        Indicator::Energy,
    ];

    /// Display name for renderers.
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Inflation => "Inflation",
            Indicator::Unemployment => "Unemployment",
            Indicator::Deficit => "Deficit",
            Indicator::Confidence => "Confidence",
            Indicator::Reserves => "Reserves",
            Indicator::Energy => "Energy",
        }
    }

    /// Suffix appended when rendering a value. The rate-like indicators
    /// display as percentages; the index-like ones display bare.
    pub fn unit_suffix(&self) -> &'static str {
        match self {
            Indicator::Inflation | Indicator::Unemployment | Indicator::Deficit => "%",
            Indicator::Confidence | Indicator::Reserves | Indicator::Energy => "",
        }
    }

    /// Value this indicator starts at in a fresh session.
    pub fn initial(&self) -> i32 {
        match self {
            Indicator::Inflation => 50,
            Indicator::Unemployment => 8,
            Indicator::Deficit => 4,
            Indicator::Confidence => 30,
            Indicator::Reserves => 60,
            Indicator::Energy => 40,
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Signed deltas applied to indicators when a choice is selected.
/// Indicators not present imply a zero delta.
pub type Effects = HashMap<Indicator, i32>;

/// The live numeric vector plus the append-only decision log.
///
/// Owned exclusively by one session; a restart builds a fresh instance
/// rather than sharing or patching an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorState {
    values: HashMap<Indicator, i32>,
    log: Vec<String>,
}

impl IndicatorState {
    /// Create a fresh state with the fixed initial vector and an empty log.
    pub fn new() -> Self {
        let values = Indicator::ALL
            .iter()
            .map(|indicator| (*indicator, indicator.initial()))
            .collect();
        Self {
            values,
            log: Vec::new(),
        }
    }

    /// Current value of an indicator.
    pub fn get(&self, indicator: Indicator) -> i32 {
        self.values.get(&indicator).copied().unwrap_or(0)
    }

    /// Apply a set of deltas in place.
    ///
    /// Every touched indicator is clamped back into
    /// [`INDICATOR_MIN`, `INDICATOR_MAX`]; untouched indicators are left
    /// unchanged. Deficit shares the 0 floor with the rest even though a
    /// surplus reading would sit below it.
    pub fn apply_effects(&mut self, effects: &Effects) {
        for (indicator, delta) in effects {
            let value = self.values.entry(*indicator).or_insert(0);
            *value = (*value + delta).clamp(INDICATOR_MIN, INDICATOR_MAX);
        }
    }

    /// Append a message to the end of the decision log.
    pub fn append_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    /// The decision log, in selection order. Never reordered or truncated
    /// during a session.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Number of decisions recorded so far.
    pub fn decisions_made(&self) -> usize {
        self.log.len()
    }
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self::new()
    }
}
