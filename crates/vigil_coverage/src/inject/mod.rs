//! Shadow-signal injection.
//!
//! [`inject`] rewrites every tagged construct of one facet so that a 1-bit
//! shadow signal reads 1 exactly when the construct's outcome happened in
//! the current step. Statement lists are rebuilt rather than edited in
//! place: each pass takes a list, emits a new one with the instrumentation
//! interleaved, and puts it back.
//!
//! Shadows written in clocked domains keep their value until the next edge,
//! so every non-combinational domain that received shadows also gets a
//! strobe prologue resetting them to 0 at the head of its root list.

mod assertion;
mod block;
mod expression;
mod statement;

use crate::descriptor::{ConstructKind, Descriptor};
use crate::error::CoverageError;
use crate::walk::for_each_fragment_mut;
use std::collections::{BTreeMap, BTreeSet};
use vigil_common::{Facet, Outcome, Value};
use vigil_tree::{
    Arena, CoverageId, Design, Expr, Fragment, Marks, Signal, SignalId, SignalKind, Statement,
};

/// Maps each shadow signal to the identity and outcome it records.
pub type ShadowIndex = BTreeMap<SignalId, (CoverageId, Outcome)>;

/// Shadow allocation state for one pass.
pub(crate) struct Injector<'a> {
    signals: &'a mut Arena<SignalId, Signal>,
    facet: Facet,
    kinds: BTreeMap<CoverageId, ConstructKind>,
    reserved: BTreeSet<String>,
    index: ShadowIndex,
    /// Shadows created for the domain body currently being rewritten.
    created: Vec<SignalId>,
}

impl<'a> Injector<'a> {
    fn signals(&self) -> &Arena<SignalId, Signal> {
        &*self.signals
    }

    /// Creates the shadow recording `outcome` of `id`.
    ///
    /// Single-outcome facets name the shadow after the identity alone;
    /// multi-outcome facets append the outcome.
    fn shadow(&mut self, id: &CoverageId, outcome: Outcome) -> Result<SignalId, CoverageError> {
        let kind = *self
            .kinds
            .get(id)
            .ok_or_else(|| CoverageError::UnknownIdentity {
                id: id.clone(),
                facet: self.facet.to_string(),
            })?;
        let mut name = format!("{}_{}", shadow_prefix(self.facet), id.flat_name(kind.as_str()));
        if self.facet.outcomes().len() > 1 {
            name.push('_');
            name.push_str(outcome.as_str());
        }
        if self.reserved.contains(&name) {
            return Err(CoverageError::InstrumentationConflict { name });
        }
        let sig = self.signals.alloc_with(|sid| Signal {
            id: sid,
            name,
            width: 1,
            init: Value::zero(1),
            kind: SignalKind::Shadow,
        });
        self.index.insert(sig, (id.clone(), outcome));
        self.created.push(sig);
        Ok(sig)
    }
}

/// Name prefix of a facet's shadow signals.
pub fn shadow_prefix(facet: Facet) -> &'static str {
    match facet {
        Facet::Statement => "stmt",
        Facet::Block => "blk",
        Facet::Assertion => "asrt",
        Facet::Expression => "expr",
    }
}

/// `shadow := value`.
pub(crate) fn record(shadow: SignalId, value: Expr) -> Statement {
    Statement::assign(shadow, value)
}

/// `shadow := 1`.
pub(crate) fn hit(shadow: SignalId) -> Statement {
    record(shadow, Expr::constant(1, 1))
}

/// The node's identity for `facet` if it has one and has not been
/// instrumented yet. Callers set `injected` once the shadows exist.
pub(crate) fn pending(marks: &Marks, facet: Facet) -> Option<CoverageId> {
    if marks.injected.contains(facet) {
        return None;
    }
    marks.id(facet).cloned()
}

/// The node's expression identities if it has not been instrumented yet.
pub(crate) fn pending_all(marks: &Marks) -> Vec<CoverageId> {
    if marks.injected.contains(Facet::Expression) {
        return Vec::new();
    }
    marks.expressions.clone()
}

/// Injects shadows for every tagged construct of `facet`.
///
/// `descriptors` must cover every identity present in the tree for `facet`;
/// a marked node without one fails with
/// [`CoverageError::UnknownIdentity`]. Constructs already instrumented for
/// `facet` are left alone, so injecting twice adds nothing.
///
/// On error the design is left exactly as it was passed in.
pub fn inject(
    design: &mut Design,
    facet: Facet,
    descriptors: &[Descriptor],
) -> Result<ShadowIndex, CoverageError> {
    design.validate()?;
    let snapshot = design.clone();
    let result = rewrite(design, facet, descriptors);
    if result.is_err() {
        *design = snapshot;
    }
    result
}

fn rewrite(
    design: &mut Design,
    facet: Facet,
    descriptors: &[Descriptor],
) -> Result<ShadowIndex, CoverageError> {
    let kinds = descriptors
        .iter()
        .filter(|d| d.facet == facet)
        .map(|d| (d.id.clone(), d.kind))
        .collect();
    let reserved = design
        .signals
        .values()
        .filter(|s| !s.is_shadow())
        .map(|s| s.name.clone())
        .collect();

    let Design { signals, root } = design;
    let mut inj = Injector {
        signals,
        facet,
        kinds,
        reserved,
        index: ShadowIndex::new(),
        created: Vec::new(),
    };
    for_each_fragment_mut(root, &mut |_path: &[String], fragment: &mut Fragment| {
        for body in &mut fragment.domains {
            inj.created.clear();
            match facet {
                Facet::Block => block::inject_domain(&mut inj, body)?,
                _ => {
                    let stmts = std::mem::take(&mut body.statements);
                    body.statements = match facet {
                        Facet::Statement => statement::inject_list(&mut inj, stmts)?,
                        Facet::Assertion => assertion::inject_list(&mut inj, stmts)?,
                        _ => expression::inject_list(&mut inj, stmts)?,
                    };
                }
            }
            if !body.domain.is_comb() && !inj.created.is_empty() {
                let strobes: Vec<Statement> = inj
                    .created
                    .iter()
                    .map(|&s| record(s, Expr::constant(0, 1)))
                    .collect();
                let rest = std::mem::take(&mut body.statements);
                body.statements = strobes.into_iter().chain(rest).collect();
            }
        }
        Ok::<(), CoverageError>(())
    })?;

    tracing::debug!(facet = %facet, shadows = inj.index.len(), "injected shadows");
    Ok(inj.index)
}
