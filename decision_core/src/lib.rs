//! # Decision Core
//!
//! The engine of the branching policy simulator. This crate interfaces with
//! `economy_rules`, drives one session at a time through the authored
//! decision graph, and classifies the final indicator state into an ending.
//!
//! ## Core Components
//!
//! - **session**: The traversal engine - one live playthrough per `Session`
//! - **ending**: Pure classification of a final state into an outcome
//! - **view**: Serializable view models handed to the presentation layer
//!
//! ## Design Philosophy
//!
//! - **Synchronous**: Each choice is processed to completion before the next
//!   is accepted; no I/O or timers in the core
//! - **Session-scoped state**: No process-wide singletons; every session
//!   owns its indicator vector and current position
//! - **Fail loudly**: Authoring defects surface at graph load, never
//!   mid-play

pub mod ending;
pub mod session;
pub mod view;

pub use ending::*;
pub use session::*;
pub use view::*;
