//! Fragments: per-domain statement lists plus an ordered list of children.

use crate::cover::Marks;
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an execution context.
///
/// The domain named [`Domain::COMB`] is combinational; every other domain is
/// a clock domain whose statements run on that domain's clock edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Name of the combinational domain.
    pub const COMB: &'static str = "comb";

    /// Creates a domain name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The combinational domain.
    pub fn comb() -> Self {
        Self::new(Self::COMB)
    }

    /// Returns the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the combinational domain.
    pub fn is_comb(&self) -> bool {
        self.0 == Self::COMB
    }
}

impl From<&str> for Domain {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The statements a fragment runs in one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainBody {
    /// The domain.
    pub domain: Domain,
    /// Statements in declaration order.
    pub statements: Vec<Statement>,
    /// Block-facet marker for the domain root.
    pub marks: Marks,
}

/// A named (or anonymous) child fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subfragment {
    /// Instance name; `None` contributes the path segment `anon`.
    pub name: Option<String>,
    /// The child.
    pub fragment: Fragment,
}

impl Subfragment {
    /// The path segment this child contributes.
    pub fn segment(&self) -> &str {
        self.name.as_deref().unwrap_or("anon")
    }
}

/// A node of the design hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Domain bodies in declaration order.
    pub domains: Vec<DomainBody>,
    /// Children in declaration order.
    pub subfragments: Vec<Subfragment>,
}

impl Fragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends statements to a domain, declaring it if it is new.
    pub fn add(&mut self, domain: impl Into<Domain>, statements: impl IntoIterator<Item = Statement>) {
        let domain = domain.into();
        let idx = match self.domains.iter().position(|d| d.domain == domain) {
            Some(idx) => idx,
            None => {
                self.domains.push(DomainBody {
                    domain,
                    statements: Vec::new(),
                    marks: Marks::default(),
                });
                self.domains.len() - 1
            }
        };
        self.domains[idx].statements.extend(statements);
    }

    /// Appends a child fragment.
    pub fn add_subfragment(&mut self, name: Option<&str>, fragment: Fragment) {
        self.subfragments.push(Subfragment {
            name: name.map(str::to_string),
            fragment,
        });
    }

    /// Looks up a domain body by name.
    pub fn domain(&self, name: &str) -> Option<&DomainBody> {
        self.domains.iter().find(|d| d.domain.as_str() == name)
    }
}
