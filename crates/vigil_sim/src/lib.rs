//! Reference simulation engine for Vigil coverage runs.
//!
//! This crate executes an elaborated [`Design`](vigil_tree::Design) with
//! 2-state values and cycle-based semantics: the `comb` domain is evaluated
//! to a fixpoint, and every other domain runs on an explicit
//! [`Simulator::tick`]. It exists to drive coverage observers, so it exposes
//! exactly the contract they consume: a per-signal state store, settled-step
//! notifications, and observer registration.
//!
//! # Usage
//!
//! ```ignore
//! use vigil_sim::Simulator;
//!
//! let mut sim = Simulator::new(&design)?;
//! sim.add_observer(&mut observer);
//! sim.set(a, 1)?;
//! sim.settle()?;
//! ```
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `evaluator` — Expression evaluation and statement execution
//! - `observer` — The step-notification contract
//! - `engine` — The simulator with its delta-cycle settle loop

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod observer;

use serde::{Deserialize, Serialize};

pub use engine::Simulator;
pub use error::SimError;
pub use observer::{SignalState, StateView, StepObserver};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Maximum delta iterations per settle before reporting a
    /// combinational loop.
    pub max_deltas: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { max_deltas: 10_000 }
    }
}
