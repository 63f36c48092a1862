//! Shared traversal helpers for the tag and inject passes.
//!
//! Every pass visits fragments in the same order: a fragment's own domain
//! bodies in declaration order, then its subfragments in declaration order,
//! each extending the hierarchical path by one segment.

use vigil_common::Facet;
use vigil_tree::{Arena, CoverageId, Fragment, Signal, SignalId, Statement};

/// The hierarchical path and domain a statement list belongs to.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Subfragment names from the root.
    pub path: Vec<String>,
    /// Domain name.
    pub domain: String,
}

impl Scope {
    /// An identity in this scope.
    pub fn id(&self, seq: u32) -> CoverageId {
        CoverageId::new(self.path.clone(), self.domain.clone(), seq)
    }

    /// The path as `top[/seg...]`.
    pub fn path_str(&self) -> String {
        CoverageId::new(self.path.clone(), self.domain.clone(), 0).path_str()
    }
}

/// Visits every fragment in pre-order, passing its hierarchical path.
pub fn for_each_fragment_mut<E>(
    root: &mut Fragment,
    f: &mut impl FnMut(&[String], &mut Fragment) -> Result<(), E>,
) -> Result<(), E> {
    let mut path = Vec::new();
    visit_mut(root, &mut path, f)
}

fn visit_mut<E>(
    fragment: &mut Fragment,
    path: &mut Vec<String>,
    f: &mut impl FnMut(&[String], &mut Fragment) -> Result<(), E>,
) -> Result<(), E> {
    f(path, fragment)?;
    for sub in &mut fragment.subfragments {
        path.push(sub.segment().to_string());
        visit_mut(&mut sub.fragment, path, f)?;
        path.pop();
    }
    Ok(())
}

/// Returns `true` for statements written by instrumentation: assignments to
/// shadow signals. Passes never tag or instrument them.
pub fn is_instrumentation(stmt: &Statement, signals: &Arena<SignalId, Signal>) -> bool {
    match stmt {
        Statement::Assign(a) => signals.get(a.target).is_some_and(Signal::is_shadow),
        _ => false,
    }
}

/// Highest sequence number any node carries for `facet`.
pub fn max_seq(root: &Fragment, facet: Facet) -> Option<u32> {
    let mut best: Option<u32> = None;
    scan_fragment(root, facet, &mut best);
    best
}

fn bump(best: &mut Option<u32>, seq: Option<u32>) {
    if let Some(seq) = seq {
        *best = Some(best.map_or(seq, |b| b.max(seq)));
    }
}

fn scan_fragment(fragment: &Fragment, facet: Facet, best: &mut Option<u32>) {
    for body in &fragment.domains {
        bump(best, body.marks.max_seq(facet));
        scan_list(&body.statements, facet, best);
    }
    for sub in &fragment.subfragments {
        scan_fragment(&sub.fragment, facet, best);
    }
}

fn scan_list(stmts: &[Statement], facet: Facet, best: &mut Option<u32>) {
    for stmt in stmts {
        bump(best, stmt.marks().max_seq(facet));
        if let Statement::Switch(s) = stmt {
            for case in &s.cases {
                bump(best, case.marks.max_seq(facet));
                scan_list(&case.body, facet, best);
            }
        }
    }
}

/// Source location of the first design statement of a list.
pub fn first_loc<'a>(
    stmts: &'a [Statement],
    signals: &Arena<SignalId, Signal>,
) -> Option<&'a vigil_tree::SrcLoc> {
    stmts
        .iter()
        .filter(|s| !is_instrumentation(s, signals))
        .find_map(Statement::loc)
}
