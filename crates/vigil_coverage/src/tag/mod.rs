//! Identity assignment.
//!
//! [`tag`] walks the design depth-first in pre-order and gives every
//! coverable construct of one facet a [`CoverageId`] plus a [`Descriptor`].
//! Identities are written into the nodes' [`Marks`](vigil_tree::Marks), which
//! is what makes a second pass over the same tree a no-op: marked nodes keep
//! their identity and only unmarked nodes are numbered, after the highest
//! sequence number already present.

mod assertion;
mod block;
mod expression;
mod statement;

pub(crate) use expression::decisions;

use crate::descriptor::{ConstructKind, Descriptor};
use crate::error::CoverageError;
use crate::naming::{render_expr, Namer};
use crate::walk::{for_each_fragment_mut, max_seq, Scope};
use vigil_common::Facet;
use vigil_tree::{Arena, CoverageId, Design, Expr, Signal, SignalId};

/// Outcome of one tagging pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TagResult {
    /// The sequence number the next new construct of this facet would get.
    pub next_id: u32,
    /// One descriptor per identity, in traversal order.
    pub descriptors: Vec<Descriptor>,
}

/// Numbering state threaded through one pass.
pub(crate) struct Tagger<'a> {
    signals: &'a Arena<SignalId, Signal>,
    namer: &'a Namer,
    facet: Facet,
    next: u32,
    fresh: usize,
    descriptors: Vec<Descriptor>,
}

impl<'a> Tagger<'a> {
    fn new(signals: &'a Arena<SignalId, Signal>, namer: &'a Namer, facet: Facet, next: u32) -> Self {
        Self {
            signals,
            namer,
            facet,
            next,
            fresh: 0,
            descriptors: Vec::new(),
        }
    }

    /// A new identity in `scope`.
    fn fresh_id(&mut self, scope: &Scope) -> CoverageId {
        let id = scope.id(self.next);
        self.next += 1;
        self.fresh += 1;
        id
    }

    /// The identity already in `slot`, or a new one stored there.
    fn claim(&mut self, slot: &mut Option<CoverageId>, scope: &Scope) -> CoverageId {
        if let Some(id) = slot {
            return id.clone();
        }
        let id = self.fresh_id(scope);
        *slot = Some(id.clone());
        id
    }

    fn record(&mut self, id: CoverageId, name: String, kind: ConstructKind) {
        self.descriptors.push(Descriptor {
            id,
            name,
            kind,
            facet: self.facet,
        });
    }

    fn render(&self, expr: &Expr) -> String {
        render_expr(self.signals, expr)
    }
}

/// Assigns identities for one facet and returns their descriptors.
///
/// The design is validated first; a structural error aborts the pass before
/// any node is marked.
pub fn tag(design: &mut Design, facet: Facet, namer: &Namer) -> Result<TagResult, CoverageError> {
    design.validate()?;
    let start = max_seq(&design.root, facet).map_or(0, |m| m + 1);

    let Design { signals, root } = design;
    let mut tagger = Tagger::new(signals, namer, facet, start);
    for_each_fragment_mut(root, &mut |path: &[String], fragment: &mut vigil_tree::Fragment| {
        for body in &mut fragment.domains {
            let scope = Scope {
                path: path.to_vec(),
                domain: body.domain.as_str().to_string(),
            };
            match facet {
                Facet::Statement => statement::tag_list(&mut tagger, &scope, &mut body.statements)?,
                Facet::Block => block::tag_domain(&mut tagger, &scope, body)?,
                Facet::Assertion => assertion::tag_list(&mut tagger, &scope, &mut body.statements)?,
                Facet::Expression => expression::tag_list(&mut tagger, &scope, &mut body.statements)?,
            }
        }
        Ok::<(), CoverageError>(())
    })?;

    tracing::debug!(
        facet = %facet,
        identities = tagger.descriptors.len(),
        fresh = tagger.fresh,
        "tagged design"
    );
    Ok(TagResult {
        next_id: tagger.next,
        descriptors: tagger.descriptors,
    })
}
