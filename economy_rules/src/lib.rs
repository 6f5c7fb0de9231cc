//! # Economy Rules
//!
//! The "Scenario Bible" crate - contains the indicator model, the decision
//! graph, and the authored crisis scenario. This crate is the single source
//! of truth for simulation data and does not contain any traversal logic.

pub mod indicators;
pub mod scenario;

pub use indicators::*;
pub use scenario::*;
