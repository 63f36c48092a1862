//! Statements: assignments, switches over case bodies, and formal directives.

use crate::cover::Marks;
use crate::expr::Expr;
use crate::ids::SignalId;
use crate::loc::SrcLoc;
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A statement in a domain's ordered statement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `target := value`.
    Assign(Assign),
    /// Dispatch on a test expression to the first matching case.
    Switch(Switch),
    /// An assert, assume, or cover directive.
    Formal(Formal),
}

/// An assignment to a whole signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    /// The driven signal.
    pub target: SignalId,
    /// The assigned value; zero-extended to the target width.
    pub value: Expr,
    /// Where the assignment was written.
    pub loc: Option<SrcLoc>,
    /// Coverage markers.
    pub marks: Marks,
}

/// A dispatch over ordered cases; the first matching case runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    /// The tested expression.
    pub test: Expr,
    /// The cases in priority order.
    pub cases: Vec<Case>,
    /// Where the switch was written.
    pub loc: Option<SrcLoc>,
    /// Coverage markers.
    pub marks: Marks,
}

/// One case of a [`Switch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Patterns matched by this case; `None` is the default case.
    pub patterns: Option<Vec<Pattern>>,
    /// Statements run when the case is taken.
    pub body: Vec<Statement>,
    /// Where the case was written.
    pub loc: Option<SrcLoc>,
    /// Coverage markers for the case itself (statement facet) and its body
    /// (block facet).
    pub marks: Marks,
}

/// Kind of formal directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormalKind {
    /// A property that must hold.
    Assert,
    /// An environment assumption.
    Assume,
    /// A condition whose occurrence is of interest.
    Cover,
}

impl FormalKind {
    /// Lowercase keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            FormalKind::Assert => "assert",
            FormalKind::Assume => "assume",
            FormalKind::Cover => "cover",
        }
    }

    /// Whether a false condition is a violation.
    pub fn can_fail(self) -> bool {
        !matches!(self, FormalKind::Cover)
    }
}

impl fmt::Display for FormalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A formal directive over a 1-bit condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formal {
    /// The directive kind.
    pub kind: FormalKind,
    /// The checked condition.
    pub condition: Expr,
    /// Where the directive was written.
    pub loc: Option<SrcLoc>,
    /// Coverage markers.
    pub marks: Marks,
}

impl Statement {
    /// An unlocated assignment.
    pub fn assign(target: SignalId, value: Expr) -> Self {
        Statement::Assign(Assign {
            target,
            value,
            loc: None,
            marks: Marks::default(),
        })
    }

    /// An unlocated switch.
    pub fn switch(test: Expr, cases: Vec<Case>) -> Self {
        Statement::Switch(Switch {
            test,
            cases,
            loc: None,
            marks: Marks::default(),
        })
    }

    /// An unlocated formal directive.
    pub fn formal(kind: FormalKind, condition: Expr) -> Self {
        Statement::Formal(Formal {
            kind,
            condition,
            loc: None,
            marks: Marks::default(),
        })
    }

    /// Attaches a source location.
    pub fn at(mut self, loc: SrcLoc) -> Self {
        *self.loc_mut() = Some(loc);
        self
    }

    /// The statement's source location.
    pub fn loc(&self) -> Option<&SrcLoc> {
        match self {
            Statement::Assign(a) => a.loc.as_ref(),
            Statement::Switch(s) => s.loc.as_ref(),
            Statement::Formal(f) => f.loc.as_ref(),
        }
    }

    fn loc_mut(&mut self) -> &mut Option<SrcLoc> {
        match self {
            Statement::Assign(a) => &mut a.loc,
            Statement::Switch(s) => &mut s.loc,
            Statement::Formal(f) => &mut f.loc,
        }
    }

    /// The statement's coverage markers.
    pub fn marks(&self) -> &Marks {
        match self {
            Statement::Assign(a) => &a.marks,
            Statement::Switch(s) => &s.marks,
            Statement::Formal(f) => &f.marks,
        }
    }

    /// Mutable access to the statement's coverage markers.
    pub fn marks_mut(&mut self) -> &mut Marks {
        match self {
            Statement::Assign(a) => &mut a.marks,
            Statement::Switch(s) => &mut s.marks,
            Statement::Formal(f) => &mut f.marks,
        }
    }
}

impl Case {
    /// A case over the given patterns.
    pub fn new(patterns: Vec<Pattern>, body: Vec<Statement>) -> Self {
        Self {
            patterns: Some(patterns),
            body,
            loc: None,
            marks: Marks::default(),
        }
    }

    /// The default case.
    pub fn default_case(body: Vec<Statement>) -> Self {
        Self {
            patterns: None,
            body,
            loc: None,
            marks: Marks::default(),
        }
    }

    /// Attaches a source location.
    pub fn at(mut self, loc: SrcLoc) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Returns `true` for the default case.
    pub fn is_default(&self) -> bool {
        self.patterns.is_none()
    }

    /// Patterns joined by `|`, or `default`.
    pub fn pattern_label(&self) -> String {
        match &self.patterns {
            None => "default".to_string(),
            Some(ps) => ps
                .iter()
                .map(Pattern::to_string)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}
