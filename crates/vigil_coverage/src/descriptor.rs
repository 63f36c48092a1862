//! Human-readable descriptors recorded for every coverage identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use vigil_common::Facet;
use vigil_tree::{CoverageId, FormalKind};

/// The kind of construct an identity was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    /// An assignment.
    Assign,
    /// A switch.
    Switch,
    /// One case of a switch.
    SwitchCase,
    /// A statement list.
    Block,
    /// An assert directive.
    Assert,
    /// An assume directive.
    Assume,
    /// A cover directive.
    Cover,
    /// A boolean decision.
    Expr,
}

impl ConstructKind {
    /// Snake-case label used in reports and shadow names.
    pub fn as_str(self) -> &'static str {
        match self {
            ConstructKind::Assign => "assign",
            ConstructKind::Switch => "switch",
            ConstructKind::SwitchCase => "switch_case",
            ConstructKind::Block => "block",
            ConstructKind::Assert => "assert",
            ConstructKind::Assume => "assume",
            ConstructKind::Cover => "cover",
            ConstructKind::Expr => "expr",
        }
    }
}

impl From<FormalKind> for ConstructKind {
    fn from(kind: FormalKind) -> Self {
        match kind {
            FormalKind::Assert => ConstructKind::Assert,
            FormalKind::Assume => ConstructKind::Assume,
            FormalKind::Cover => ConstructKind::Cover,
        }
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identity together with its display name, construct kind, and facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// The identity.
    pub id: CoverageId,
    /// Location, path, domain, and construct rendered for humans.
    pub name: String,
    /// What kind of construct this is.
    pub kind: ConstructKind,
    /// The facet that assigned the identity.
    pub facet: Facet,
}
