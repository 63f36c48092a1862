//! Per-identity outcome counts.

use std::collections::BTreeMap;
use vigil_common::Outcome;
use vigil_tree::CoverageId;

/// Hit counts keyed by identity and outcome.
pub type OutcomeCounter = BTreeMap<(CoverageId, Outcome), u64>;

/// Adds every count of `from` into `into`. Saturates instead of wrapping.
pub fn merge_counts(into: &mut OutcomeCounter, from: &OutcomeCounter) {
    for (key, &count) in from {
        let slot = into.entry(key.clone()).or_insert(0);
        *slot = slot.saturating_add(count);
    }
}

/// Count recorded for one identity and outcome; absent keys read as 0.
pub fn count(counter: &OutcomeCounter, id: &CoverageId, outcome: Outcome) -> u64 {
    counter.get(&(id.clone(), outcome)).copied().unwrap_or(0)
}
