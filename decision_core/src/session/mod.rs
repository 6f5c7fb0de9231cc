//! The traversal engine - one live playthrough over a decision graph.

use std::sync::Arc;

use economy_rules::{DecisionGraph, GraphError, IndicatorState, Node, NodeKey, Successor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ending::classify;
use crate::view::{EndingReport, IndicatorsView, SceneView};

/// Unique identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by the traversal engine.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Propagated authoring defect; see [`GraphError`].
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The caller asked for a choice index the current node does not offer.
    /// A programming defect in the caller; the session state is untouched.
    #[error("choice index {index} out of range for node {node} ({available} choices)")]
    InvalidChoice {
        node: NodeKey,
        index: usize,
        available: usize,
    },

    /// The session already reached an ending; only `restart` is accepted.
    #[error("session {0} has already finished")]
    SessionComplete(SessionId),
}

/// Where a session currently stands.
#[derive(Debug, Clone)]
enum Phase {
    /// Waiting for a choice at this node.
    AtNode(NodeKey),

    /// Terminal. The classified ending is held for display; no further
    /// choices are accepted.
    Complete(EndingReport),
}

/// The answer to a processed choice: the next scene, or the ending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Turn {
    Scene(SceneView),
    Ended(EndingReport),
}

/// One live playthrough.
///
/// Holds the shared immutable graph, the session's own indicator vector,
/// and the current position. Sessions are isolated from each other; the
/// graph is the only shared piece.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    graph: Arc<DecisionGraph>,
    state: IndicatorState,
    phase: Phase,
}

impl Session {
    /// Start a session at the graph's designated start node.
    pub fn new(graph: Arc<DecisionGraph>) -> Self {
        let start = graph.start().clone();
        let session = Self {
            id: SessionId::new(),
            graph,
            state: IndicatorState::new(),
            phase: Phase::AtNode(start),
        };
        debug!(session = %session.id, "session started");
        session
    }

    /// Start a session over the built-in scenario.
    pub fn standard() -> Self {
        Self::new(DecisionGraph::standard())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The node awaiting a choice, or `None` once the session is complete.
    pub fn current_node(&self) -> Option<&Node> {
        match &self.phase {
            Phase::AtNode(key) => self.graph.get(key),
            Phase::Complete(_) => None,
        }
    }

    /// Rendering view of the current node, if any.
    pub fn scene(&self) -> Option<SceneView> {
        self.current_node().map(SceneView::of)
    }

    /// Snapshot of the indicators and the decision log for rendering.
    pub fn indicators(&self) -> IndicatorsView {
        IndicatorsView::of(&self.state)
    }

    /// Direct read access to the live state.
    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    /// The classified ending, once reached.
    pub fn ending(&self) -> Option<&EndingReport> {
        match &self.phase {
            Phase::Complete(report) => Some(report),
            Phase::AtNode(_) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete(_))
    }

    /// Process one user choice to completion.
    ///
    /// The index is validated before any state is touched. On success the
    /// choice's effects are applied, its log line recorded, and the session
    /// either advances to the successor node or classifies the final state
    /// and goes terminal. Returns the new view state for the renderer.
    pub fn select_choice(&mut self, index: usize) -> Result<Turn, SimulationError> {
        let key = match &self.phase {
            Phase::AtNode(key) => key.clone(),
            Phase::Complete(_) => return Err(SimulationError::SessionComplete(self.id)),
        };

        let node = self.graph.node(&key)?;
        let choice = node
            .choice(index)
            .ok_or_else(|| SimulationError::InvalidChoice {
                node: key.clone(),
                index,
                available: node.choice_count(),
            })?;

        self.state.apply_effects(&choice.effects);
        self.state.append_log(choice.log.clone());
        info!(
            session = %self.id,
            node = %key,
            choice = index,
            log = %choice.log,
            "choice applied"
        );

        match &choice.next {
            Successor::End => {
                let report = EndingReport::new(classify(&self.state), &self.state);
                info!(
                    session = %self.id,
                    category = report.category.as_str(),
                    title = %report.title,
                    "session ended"
                );
                self.phase = Phase::Complete(report.clone());
                Ok(Turn::Ended(report))
            }
            Successor::Node(next_key) => {
                let next_key = next_key.clone();
                let scene = SceneView::of(self.graph.node(&next_key)?);
                self.phase = Phase::AtNode(next_key);
                Ok(Turn::Scene(scene))
            }
        }
    }

    /// Full session reset: fresh indicator vector, empty log, back to the
    /// start node. Not an undo; prior history and any ending are discarded.
    pub fn restart(&mut self) {
        self.state = IndicatorState::new();
        self.phase = Phase::AtNode(self.graph.start().clone());
        debug!(session = %self.id, "session restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ending::OutcomeCategory;
    use economy_rules::Indicator;

    /// Two-step scenario whose opening choices can actually reach each
    /// outcome family from the fixed initial vector.
    const STABILISATION: &str = r#"
        start = "S1"

        [nodes.S1]
        title = "Stabilisation plan"
        narrative = "Choose the programme."

        [[nodes.S1.choices]]
        label = "Orthodox adjustment"
        effects = { inflation = -30, confidence = 30, deficit = -2 }
        next = "S2"
        log = "Orthodox adjustment begun."

        [[nodes.S1.choices]]
        label = "Monetise the deficit"
        effects = { inflation = 45, confidence = -10 }
        next = "S2"
        log = "Deficit monetised."

        [[nodes.S1.choices]]
        label = "Shock therapy without a safety net"
        effects = { inflation = -40, unemployment = 10, confidence = -20 }
        next = "S2"
        log = "Shock therapy applied."

        [nodes.S2]
        title = "Results"
        narrative = "Assess the final state."

        [[nodes.S2.choices]]
        label = "See the final outcome"
        effects = {}
        next = "END"
        log = "Simulation closed."
    "#;

    fn stabilisation_session() -> Session {
        let graph = DecisionGraph::from_toml_str(STABILISATION).unwrap();
        Session::new(Arc::new(graph))
    }

    fn values(session: &Session) -> [i32; 6] {
        let state = session.state();
        [
            state.get(Indicator::Inflation),
            state.get(Indicator::Unemployment),
            state.get(Indicator::Deficit),
            state.get(Indicator::Confidence),
            state.get(Indicator::Reserves),
            state.get(Indicator::Energy),
        ]
    }

    #[test]
    fn test_session_opens_at_start_node() {
        let session = Session::standard();

        let node = session.current_node().unwrap();
        assert_eq!(node.key.as_str(), "N1");
        assert_eq!(node.choice_count(), 3);
        assert!(!session.is_complete());
        assert!(session.ending().is_none());
        assert_eq!(values(&session), [50, 8, 4, 30, 60, 40]);
    }

    #[test]
    fn test_interest_rate_hike_moves_state_and_advances() {
        let mut session = Session::standard();

        let turn = session.select_choice(1).unwrap();

        assert_eq!(values(&session), [35, 11, 4, 25, 65, 40]);
        assert_eq!(session.current_node().unwrap().key.as_str(), "N3B");
        match turn {
            Turn::Scene(scene) => assert_eq!(scene.key, "N3B"),
            Turn::Ended(_) => panic!("session should not have ended"),
        }
    }

    #[test]
    fn test_log_grows_by_one_per_choice() {
        let mut session = Session::standard();

        assert_eq!(session.state().decisions_made(), 0);

        session.select_choice(1).unwrap();
        assert_eq!(session.state().decisions_made(), 1);

        session.select_choice(0).unwrap();
        assert_eq!(session.state().decisions_made(), 2);

        session.select_choice(1).unwrap();
        assert_eq!(session.state().decisions_made(), 3);

        assert_eq!(
            session.state().log(),
            [
                "Interest rate raised.",
                "Temporary public employment started.",
                "Inflation-targeting regime adopted.",
            ]
        );
    }

    #[test]
    fn test_invalid_choice_leaves_state_untouched() {
        let mut session = Session::standard();
        session.select_choice(1).unwrap();

        let before_values = values(&session);
        let before_log = session.state().log().to_vec();

        let err = session.select_choice(7).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidChoice {
                ref node,
                index: 7,
                available: 2,
            } if node.as_str() == "N3B"
        ));

        assert_eq!(values(&session), before_values);
        assert_eq!(session.state().log(), before_log);
        assert_eq!(session.current_node().unwrap().key.as_str(), "N3B");
    }

    #[test]
    fn test_full_standard_playthrough_reaches_stagnation() {
        let mut session = Session::standard();

        session.select_choice(1).unwrap(); // raise rates
        session.select_choice(1).unwrap(); // fiscal adjustment
        session.select_choice(1).unwrap(); // inflation targeting
        session.select_choice(1).unwrap(); // clean float
        let turn = session.select_choice(0).unwrap(); // see the outcome

        let report = match turn {
            Turn::Ended(report) => report,
            Turn::Scene(_) => panic!("playthrough should have ended"),
        };

        assert_eq!(values(&session), [30, 12, 3, 39, 70, 40]);
        assert_eq!(report.category, OutcomeCategory::Warn);
        assert_eq!(report.title, "Stagnation with stability");
        assert_eq!(report.final_indicators.log.len(), 5);
        assert!(report.trajectory().contains("Inflation 30%"));

        assert!(session.is_complete());
        assert!(session.current_node().is_none());
        assert!(session.scene().is_none());
        assert_eq!(session.ending().unwrap().title, "Stagnation with stability");
    }

    #[test]
    fn test_recovery_playthrough_ends_good() {
        let mut session = stabilisation_session();

        session.select_choice(0).unwrap();
        let turn = session.select_choice(0).unwrap();

        let report = match turn {
            Turn::Ended(report) => report,
            Turn::Scene(_) => panic!("playthrough should have ended"),
        };
        assert_eq!(report.category, OutcomeCategory::Good);
        assert_eq!(report.title, "Slow but sustained recovery");
        assert_eq!(values(&session), [20, 8, 2, 60, 60, 40]);
    }

    #[test]
    fn test_runaway_inflation_playthrough_ends_bad() {
        let mut session = stabilisation_session();

        session.select_choice(1).unwrap();
        let turn = session.select_choice(0).unwrap();

        match turn {
            Turn::Ended(report) => assert_eq!(report.category, OutcomeCategory::Bad),
            Turn::Scene(_) => panic!("playthrough should have ended"),
        }
    }

    #[test]
    fn test_collapsed_confidence_outranks_recession_in_play() {
        // Shock therapy matches both the collapsed-confidence rule and the
        // recession rule at the end; the first must win.
        let mut session = stabilisation_session();

        session.select_choice(2).unwrap();
        assert_eq!(session.state().get(Indicator::Confidence), 10);

        let turn = session.select_choice(0).unwrap();
        match turn {
            Turn::Ended(report) => {
                assert_eq!(report.category, OutcomeCategory::Bad);
                assert_eq!(report.title, "Hyperinflation and social chaos");
            }
            Turn::Scene(_) => panic!("playthrough should have ended"),
        }
    }

    #[test]
    fn test_terminal_session_rejects_further_choices() {
        let mut session = stabilisation_session();
        session.select_choice(0).unwrap();
        session.select_choice(0).unwrap();
        assert!(session.is_complete());

        let err = session.select_choice(0).unwrap_err();
        assert!(matches!(err, SimulationError::SessionComplete(id) if id == session.id()));

        // The ending and final state are unchanged by the rejected call.
        assert_eq!(session.ending().unwrap().category, OutcomeCategory::Good);
        assert_eq!(session.state().decisions_made(), 2);
    }

    #[test]
    fn test_restart_is_a_full_reset() {
        let mut session = stabilisation_session();
        session.select_choice(1).unwrap();
        session.select_choice(0).unwrap();
        assert!(session.is_complete());

        session.restart();

        assert!(!session.is_complete());
        assert!(session.ending().is_none());
        assert_eq!(session.current_node().unwrap().key.as_str(), "S1");
        assert_eq!(values(&session), [50, 8, 4, 30, 60, 40]);
        assert!(session.state().log().is_empty());
        assert_eq!(session.state(), &IndicatorState::new());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let graph = DecisionGraph::standard();
        let mut first = Session::new(graph.clone());
        let second = Session::new(graph);

        first.select_choice(1).unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(values(&second), [50, 8, 4, 30, 60, 40]);
        assert!(second.state().log().is_empty());
        assert_eq!(second.current_node().unwrap().key.as_str(), "N1");
    }

    #[test]
    fn test_indicators_view_follows_play() {
        let mut session = Session::standard();
        session.select_choice(1).unwrap();

        let view = session.indicators();
        assert_eq!(view.readings[0].display, "35%");
        assert_eq!(view.log, ["Interest rate raised."]);
    }
}
