//! Runtime observation of shadow signals.

use crate::counter::OutcomeCounter;
use crate::inject::ShadowIndex;
use vigil_common::Facet;
use vigil_sim::{SignalState, StepObserver};

/// Counts, for one facet and one run, how many settled steps each shadow
/// signal read true.
///
/// A run that never steps leaves every count at zero; that is reported as
/// uncovered, not as an error.
///
/// Shadows in clock domains are registers: they hold the last edge's value
/// until the next edge. A `settle()` between two ticks therefore counts that
/// edge again, so raw hit counts can exceed the number of times a construct
/// ran. Whether a construct is covered is unaffected.
#[derive(Debug, Clone)]
pub struct CoverageObserver {
    facet: Facet,
    index: ShadowIndex,
    counts: OutcomeCounter,
    steps: u64,
}

impl CoverageObserver {
    /// An observer over the shadows of one facet.
    pub fn new(facet: Facet, index: ShadowIndex) -> Self {
        Self {
            facet,
            index,
            counts: OutcomeCounter::new(),
            steps: 0,
        }
    }

    /// The observed facet.
    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// Counts accumulated so far. Valid at any point of a run.
    pub fn get_results(&self) -> &OutcomeCounter {
        &self.counts
    }

    /// Consumes the observer, returning its counts.
    pub fn into_results(self) -> OutcomeCounter {
        self.counts
    }

    /// Number of steps observed.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl StepObserver for CoverageObserver {
    fn on_step(&mut self, state: &dyn SignalState) {
        self.steps += 1;
        for (&signal, (id, outcome)) in &self.index {
            if state.get(signal).is_true() {
                *self.counts.entry((id.clone(), *outcome)).or_insert(0) += 1;
            }
        }
    }
}
