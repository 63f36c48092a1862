//! Errors raised while loading a `vigil.toml`.

use std::path::PathBuf;
use vigil_common::Facet;

/// Why a coverage configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid TOML or does not match the schema.
    #[error("invalid coverage configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// `coverage.label` is empty.
    #[error("coverage.label must not be empty")]
    EmptyLabel,

    /// `coverage.facets` is an empty list.
    #[error("coverage.facets must name at least one facet")]
    NoFacets,

    /// A facet is listed more than once.
    #[error("facet '{0}' is listed more than once in coverage.facets")]
    DuplicateFacet(Facet),

    /// `coverage.report_prefix` is present but empty.
    #[error("coverage.report_prefix must not be empty")]
    EmptyReportPrefix,

    /// `simulation.max_deltas` is zero.
    #[error("simulation.max_deltas must be positive")]
    ZeroMaxDeltas,
}
