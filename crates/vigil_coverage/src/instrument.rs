//! Whole-design instrumentation for a set of facets.

use crate::descriptor::Descriptor;
use crate::error::CoverageError;
use crate::inject::{inject, ShadowIndex};
use crate::naming::Namer;
use crate::observer::CoverageObserver;
use crate::tag::tag;
use vigil_common::Facet;
use vigil_tree::Design;

/// What instrumentation produced for one facet.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetPlan {
    /// The facet.
    pub facet: Facet,
    /// Descriptors of every identity of the facet.
    pub descriptors: Vec<Descriptor>,
    /// Shadow signals created for the facet.
    pub index: ShadowIndex,
}

/// The result of [`instrument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instrumentation {
    /// One plan per instrumented facet, in request order.
    pub plans: Vec<FacetPlan>,
}

impl Instrumentation {
    /// The plan of one facet.
    pub fn plan(&self, facet: Facet) -> Option<&FacetPlan> {
        self.plans.iter().find(|p| p.facet == facet)
    }

    /// Fresh observers for one run, one per plan.
    pub fn observers(&self) -> Vec<CoverageObserver> {
        self.plans
            .iter()
            .map(|p| CoverageObserver::new(p.facet, p.index.clone()))
            .collect()
    }
}

/// Tags every requested facet, then injects every requested facet.
///
/// Tagging all facets before any injection keeps each facet's numbering
/// independent of the other facets' shadows. Repeated facets are
/// instrumented once. If any facet fails, the design is restored to its
/// state before the call, so earlier facets are not left half applied.
pub fn instrument(
    design: &mut Design,
    facets: &[Facet],
    namer: &Namer,
) -> Result<Instrumentation, CoverageError> {
    let snapshot = design.clone();
    let result = instrument_all(design, facets, namer);
    if result.is_err() {
        *design = snapshot;
    }
    result
}

fn instrument_all(
    design: &mut Design,
    facets: &[Facet],
    namer: &Namer,
) -> Result<Instrumentation, CoverageError> {
    let mut wanted: Vec<Facet> = Vec::with_capacity(facets.len());
    for &facet in facets {
        if !wanted.contains(&facet) {
            wanted.push(facet);
        }
    }

    let mut tagged = Vec::with_capacity(wanted.len());
    for &facet in &wanted {
        tagged.push((facet, tag(design, facet, namer)?.descriptors));
    }

    let mut plans = Vec::with_capacity(tagged.len());
    for (facet, descriptors) in tagged {
        let index = inject(design, facet, &descriptors)?;
        plans.push(FacetPlan {
            facet,
            descriptors,
            index,
        });
    }

    tracing::info!(
        facets = plans.len(),
        shadows = plans.iter().map(|p| p.index.len()).sum::<usize>(),
        "instrumented design"
    );
    Ok(Instrumentation { plans })
}
