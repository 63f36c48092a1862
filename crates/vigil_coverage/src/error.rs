//! Error types for coverage instrumentation and reporting.

use std::io;
use vigil_tree::{CoverageId, TreeError};

/// Errors raised while tagging, injecting, or writing reports.
///
/// Tagging and injection errors are fatal for the run being instrumented;
/// merging never fails.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// The design tree is malformed.
    #[error("structural error: {0}")]
    Structural(#[from] TreeError),

    /// A shadow signal name would alias an existing design signal.
    #[error("instrumentation conflict: shadow '{name}' aliases a design signal")]
    InstrumentationConflict {
        /// The generated shadow name.
        name: String,
    },

    /// A node carries an identity that the descriptor set passed to
    /// injection does not contain.
    #[error("node marked with {id} has no {facet} descriptor")]
    UnknownIdentity {
        /// The identity found on the node.
        id: CoverageId,
        /// The facet being injected.
        facet: String,
    },

    /// A serialized identity could not be parsed.
    #[error("malformed coverage id '{0}'")]
    MalformedId(String),

    /// An I/O error while writing or reading a report.
    #[error("report I/O error: {0}")]
    Io(#[from] io::Error),

    /// A report could not be serialized or parsed.
    #[error("report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
