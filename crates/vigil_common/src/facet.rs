//! Coverage facets and the outcome buckets each of them records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four coverage kinds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    /// Every assignment, dispatch, and dispatch case executed at least once.
    Statement,
    /// Every statement list (domain root or case body) entered at least once.
    Block,
    /// Every assert/assume/cover directive evaluated, with failures kept apart.
    Assertion,
    /// Every boolean decision observed both true and false.
    Expression,
}

impl Facet {
    /// All facets in reporting order.
    pub const ALL: [Facet; 4] = [
        Facet::Statement,
        Facet::Block,
        Facet::Assertion,
        Facet::Expression,
    ];

    /// Lowercase name used in configuration files and report file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Statement => "statement",
            Facet::Block => "block",
            Facet::Assertion => "assertion",
            Facet::Expression => "expression",
        }
    }

    /// Capitalized name used in human summary lines.
    pub fn title(self) -> &'static str {
        match self {
            Facet::Statement => "Statement",
            Facet::Block => "Block",
            Facet::Assertion => "Assertion",
            Facet::Expression => "Expression",
        }
    }

    /// The outcome buckets an identity of this facet can record.
    pub fn outcomes(self) -> &'static [Outcome] {
        match self {
            Facet::Statement | Facet::Block => &[Outcome::Hit],
            Facet::Assertion => &[Outcome::True, Outcome::False, Outcome::Fail],
            Facet::Expression => &[Outcome::True, Outcome::False],
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facet::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown coverage facet '{s}'"))
    }
}

/// A named observation bucket recorded per coverage identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The construct executed (statement and block facets).
    Hit,
    /// The observed condition read true.
    True,
    /// The observed condition read false.
    False,
    /// An assert or assume condition was violated.
    Fail,
}

impl Outcome {
    /// Lowercase label, also used as a shadow-signal name suffix.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::True => "true",
            Outcome::False => "false",
            Outcome::Fail => "fail",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
