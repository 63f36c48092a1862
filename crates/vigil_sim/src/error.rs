//! Simulation error types.
//!
//! All errors that can occur while building or driving a [`Simulator`]
//! are represented as variants of [`SimError`].
//!
//! [`Simulator`]: crate::Simulator

use vigil_tree::{SignalId, TreeError};

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The design failed structural validation.
    #[error("malformed design: {0}")]
    Structural(#[from] TreeError),

    /// A signal ID not present in the design's signal table.
    #[error("unknown signal {0}")]
    UnknownSignal(SignalId),

    /// Stimulus was applied to a signal the design itself drives.
    #[error("signal '{name}' is driven by domain '{domain}' and cannot take stimulus")]
    DrivenSignal {
        /// Name of the signal.
        name: String,
        /// Domain that drives it.
        domain: String,
    },

    /// A signal is assigned from more than one domain.
    #[error("signal '{name}' is driven from both '{first}' and '{second}'")]
    MultipleDrivers {
        /// Name of the signal.
        name: String,
        /// First driving domain.
        first: String,
        /// Second driving domain.
        second: String,
    },

    /// `tick` was called for a domain the design does not declare.
    #[error("no clock domain named '{0}'")]
    UnknownDomain(String),

    /// An expression could not be evaluated.
    #[error("evaluation error: {reason}")]
    EvalError {
        /// Description of what went wrong during evaluation.
        reason: String,
    },

    /// Combinational logic failed to converge, indicating a combinational loop.
    #[error("delta cycle limit exceeded (max {max_deltas} deltas)")]
    DeltaCycleLimit {
        /// The maximum number of delta cycles allowed.
        max_deltas: u32,
    },
}
