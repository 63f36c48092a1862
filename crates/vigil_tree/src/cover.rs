//! Coverage identities and the per-node markers that record them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vigil_common::Facet;

/// A stable identity for one coverable construct.
///
/// Identities order structurally (path, then domain, then sequence number),
/// so every map keyed by them iterates in the same order in every process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoverageId {
    /// Names of the subfragments leading from the root to the owning fragment.
    pub path: Vec<String>,
    /// The domain the construct belongs to.
    pub domain: String,
    /// Sequence number within the facet's numbering.
    pub seq: u32,
}

impl CoverageId {
    /// Creates an identity.
    pub fn new(path: Vec<String>, domain: impl Into<String>, seq: u32) -> Self {
        Self {
            path,
            domain: domain.into(),
            seq,
        }
    }

    /// The hierarchical path as `top[/seg...]`.
    pub fn path_str(&self) -> String {
        let mut s = String::from("top");
        for seg in &self.path {
            s.push('/');
            s.push_str(seg);
        }
        s
    }

    /// The path, domain, and sequence joined with `_`, for use in signal names.
    pub fn flat_name(&self, kind: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            self.path_str().replace('/', "_"),
            self.domain,
            kind,
            self.seq
        )
    }
}

impl fmt::Display for CoverageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path_str(), self.domain, self.seq)
    }
}

/// Error returned when parsing a malformed identity string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed coverage id '{0}'")]
pub struct ParseCoverageIdError(pub String);

impl FromStr for CoverageId {
    type Err = ParseCoverageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseCoverageIdError(s.to_string());
        let mut parts = s.rsplitn(3, ':');
        let seq = parts.next().ok_or_else(bad)?;
        let domain = parts.next().ok_or_else(bad)?;
        let path = parts.next().ok_or_else(bad)?;
        let seq: u32 = seq.parse().map_err(|_| bad())?;
        if domain.is_empty() {
            return Err(bad());
        }
        let mut segs = path.split('/');
        if segs.next() != Some("top") {
            return Err(bad());
        }
        let path: Vec<String> = segs.map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(bad());
        }
        Ok(CoverageId::new(path, domain, seq))
    }
}

/// A set of facets, stored as a bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetSet(u8);

impl FacetSet {
    fn bit(facet: Facet) -> u8 {
        match facet {
            Facet::Statement => 1,
            Facet::Block => 2,
            Facet::Assertion => 4,
            Facet::Expression => 8,
        }
    }

    /// Adds a facet. Returns `false` if it was already present.
    pub fn insert(&mut self, facet: Facet) -> bool {
        let had = self.contains(facet);
        self.0 |= Self::bit(facet);
        !had
    }

    /// Returns `true` if the facet is in the set.
    pub fn contains(self, facet: Facet) -> bool {
        self.0 & Self::bit(facet) != 0
    }

    /// Returns `true` if no facet is in the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Identity markers attached to a tree node by the coverage passes.
///
/// A node that already carries an identity for a facet keeps it when that
/// facet is tagged again, and a node whose `injected` set holds a facet is
/// not instrumented for it a second time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marks {
    /// Statement-facet identity (assignments, switches, cases).
    pub statement: Option<CoverageId>,
    /// Block-facet identity (domain roots, case bodies).
    pub block: Option<CoverageId>,
    /// Assertion-facet identity (formal directives).
    pub assertion: Option<CoverageId>,
    /// Expression-facet identities in collection order.
    pub expressions: Vec<CoverageId>,
    /// Facets already injected at this node.
    pub injected: FacetSet,
}

impl Marks {
    /// The single identity of a statement, block or assertion facet.
    pub fn id(&self, facet: Facet) -> Option<&CoverageId> {
        match facet {
            Facet::Statement => self.statement.as_ref(),
            Facet::Block => self.block.as_ref(),
            Facet::Assertion => self.assertion.as_ref(),
            Facet::Expression => self.expressions.first(),
        }
    }

    /// Highest sequence number recorded here for `facet`.
    pub fn max_seq(&self, facet: Facet) -> Option<u32> {
        match facet {
            Facet::Expression => self.expressions.iter().map(|id| id.seq).max(),
            _ => self.id(facet).map(|id| id.seq),
        }
    }
}
