//! The structured coverage document and listing options.
//!
//! One [`CoverageDocument`] is written per facet. Exactly one of the record
//! arrays is present, matching the facet; every record carries the stable
//! id string, the descriptor name, the construct kind, and the raw outcome
//! counts, so a consumer can recompute any coverage definition.

use serde::{Deserialize, Serialize};
use vigil_common::Facet;

/// Coverage counts of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Covered identities; for assertions, identities with any activity.
    pub covered: usize,
    /// All identities.
    pub total: usize,
    /// `covered / total * 100`, or 100 when `total` is zero.
    pub percent: f64,
    /// Assertions with at least one failure. Absent for other facets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
}

/// A statement or block record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Canonical identity string.
    pub id: String,
    /// Descriptor name.
    pub name: String,
    /// Construct kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Steps the construct executed in.
    pub hits: u64,
}

/// An assertion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionRecord {
    /// Canonical identity string.
    pub id: String,
    /// Descriptor name.
    pub name: String,
    /// Construct kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Steps the condition read true.
    #[serde(rename = "true")]
    pub true_count: u64,
    /// Steps the condition read false.
    #[serde(rename = "false")]
    pub false_count: u64,
    /// Steps the directive was violated.
    pub fail: u64,
    /// `fail > 0`.
    pub failed: bool,
}

/// An expression record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    /// Canonical identity string.
    pub id: String,
    /// Descriptor name.
    pub name: String,
    /// Construct kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Steps the decision read true.
    pub true_hits: u64,
    /// Steps the decision read false.
    pub false_hits: u64,
    /// Both polarities were observed.
    pub covered: bool,
}

/// The JSON report of one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDocument {
    /// The reported facet.
    pub facet: Facet,
    /// Session label.
    pub label: String,
    /// Runs merged into the report.
    pub runs: u64,
    /// Hex content hash of the descriptor set.
    pub fingerprint: String,
    /// Aggregate counts.
    pub summary: Summary,
    /// Statement records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statements: Option<Vec<HitRecord>>,
    /// Block records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<HitRecord>>,
    /// Assertion records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertions: Option<Vec<AssertionRecord>>,
    /// Expression records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Vec<ExpressionRecord>>,
}

/// Ordering of a text listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// By identity (hierarchical path, domain, sequence).
    #[default]
    Id,
    /// By descriptor name.
    Name,
    /// By total outcome count, highest first.
    Hits,
}

/// What a text listing shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOptions {
    /// Include covered identities.
    pub show_hits: bool,
    /// Include uncovered identities.
    pub show_misses: bool,
    /// Print at most this many lines, then a `... N more` line.
    pub max_print: Option<usize>,
    /// Line order.
    pub sort_by: SortBy,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            show_hits: true,
            show_misses: true,
            max_print: None,
            sort_by: SortBy::Name,
        }
    }
}
