//! Determinism, idempotence, non-interference and merge algebra.

mod common;

use proptest::prelude::*;
use vigil_common::{Facet, Outcome, Value};
use vigil_coverage::{instrument, tag, AggregateReport, ConstructKind, Descriptor, Namer, OutcomeCounter};
use vigil_sim::Simulator;
use vigil_tree::{CoverageId, Design, SignalId};

#[test]
fn separate_builds_tag_identically() {
    let namer = Namer::with_anchor("ip");
    let mut first = common::controller();
    let mut second = common::controller();
    let a = instrument(&mut first, &Facet::ALL, &namer).unwrap();
    let b = instrument(&mut second, &Facet::ALL, &namer).unwrap();
    assert_eq!(a, b);
    let json_a = serde_json::to_string(&a.plans[0].descriptors).unwrap();
    let json_b = serde_json::to_string(&b.plans[0].descriptors).unwrap();
    assert_eq!(json_a, json_b);
    assert_eq!(
        a.plans[0].descriptors[0].name,
        "ip/ctrl.py:14 | comb:y = (a & b) | q[1]"
    );
}

#[test]
fn retagging_after_instrumentation_is_stable() {
    let namer = Namer::new();
    let mut d = common::controller();
    let inst = instrument(&mut d, &Facet::ALL, &namer).unwrap();
    for plan in &inst.plans {
        let again = tag(&mut d, plan.facet, &namer).unwrap();
        assert_eq!(again.descriptors, plan.descriptors, "{} facet drifted", plan.facet);
    }
}

#[test]
fn identities_are_unique_per_facet() {
    let mut d = common::controller();
    let inst = instrument(&mut d, &Facet::ALL, &Namer::new()).unwrap();
    for plan in &inst.plans {
        let mut ids: Vec<&CoverageId> = plan.descriptors.iter().map(|d| &d.id).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before, "duplicate identity in {} facet", plan.facet);
    }
}

type Stimulus = Vec<(u64, u64, u64)>;

/// Values of the design's own signals after every step of `stimulus`.
fn trace(design: &Design, originals: usize, stimulus: &Stimulus) -> Vec<Vec<Value>> {
    let mut sim = Simulator::new(design).unwrap();
    let a = sim.find_signal("a").unwrap();
    let b = sim.find_signal("b").unwrap();
    let sel = sim.find_signal("sel").unwrap();
    let snapshot = |sim: &Simulator<'_>| -> Vec<Value> {
        (0..originals as u32).map(|i| sim.get(SignalId::from_raw(i))).collect()
    };
    let mut out = Vec::new();
    for &(va, vb, vs) in stimulus {
        sim.set(a, va).unwrap();
        sim.set(b, vb).unwrap();
        sim.set(sel, vs).unwrap();
        sim.settle().unwrap();
        out.push(snapshot(&sim));
        sim.tick("sync").unwrap();
        out.push(snapshot(&sim));
    }
    out
}

const OUTCOMES: [Outcome; 3] = [Outcome::True, Outcome::False, Outcome::Fail];

fn descriptors() -> Vec<Descriptor> {
    (0..6)
        .map(|seq| Descriptor {
            id: CoverageId::new(vec![], "comb", seq),
            name: format!("t.py:{seq} | top | comb:assert(c{seq})"),
            kind: ConstructKind::Assert,
            facet: Facet::Assertion,
        })
        .collect()
}

fn counter() -> impl Strategy<Value = OutcomeCounter> {
    proptest::collection::vec((0u32..6, 0usize..3, 0u64..1000), 0..16).prop_map(|entries| {
        let mut c = OutcomeCounter::new();
        for (seq, o, n) in entries {
            *c.entry((CoverageId::new(vec![], "comb", seq), OUTCOMES[o]))
                .or_insert(0) += n;
        }
        c
    })
}

fn merged(runs: &[&OutcomeCounter]) -> AggregateReport {
    let descs = descriptors();
    let mut report = AggregateReport::new(Facet::Assertion);
    for run in runs {
        report.merge(run, &descs);
    }
    report
}

proptest! {
    #[test]
    fn prop_instrumentation_does_not_perturb_design(
        stimulus in proptest::collection::vec((0u64..2, 0u64..2, 0u64..4), 0..10)
    ) {
        let plain = common::controller();
        let originals = plain.signals.len();
        let mut instrumented = common::controller();
        instrument(&mut instrumented, &Facet::ALL, &Namer::new()).unwrap();
        prop_assert!(instrumented.signals.len() > originals);
        prop_assert_eq!(
            trace(&plain, originals, &stimulus),
            trace(&instrumented, originals, &stimulus)
        );
    }

    #[test]
    fn prop_merge_is_commutative(a in counter(), b in counter()) {
        prop_assert_eq!(merged(&[&a, &b]), merged(&[&b, &a]));
    }

    #[test]
    fn prop_merge_is_associative(a in counter(), b in counter(), c in counter()) {
        let mut left = merged(&[&a, &b]);
        left.merge_report(&merged(&[&c]));
        let mut right = merged(&[&a]);
        right.merge_report(&merged(&[&b, &c]));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_counts_never_decrease(runs in proptest::collection::vec(counter(), 1..6)) {
        let descs = descriptors();
        let mut report = AggregateReport::new(Facet::Assertion);
        let mut previous = report.counts().clone();
        for run in &runs {
            report.merge(run, &descs);
            for (key, &before) in &previous {
                prop_assert!(report.counts().get(key).copied().unwrap_or(0) >= before);
            }
            prop_assert!(report.summary().covered >= {
                let mut old = AggregateReport::new(Facet::Assertion);
                old.merge(&previous, &descs);
                old.summary().covered
            }, "covered count decreased after merge");
            previous = report.counts().clone();
        }
    }
}
