//! End-to-end runs: instrument, simulate, aggregate.

mod common;

use common::run;
use vigil_common::{Facet, Outcome};
use vigil_coverage::{instrument, AggregateReport, Namer};
use vigil_tree::{Case, Design, Expr, FormalKind, Pattern, SrcLoc, Statement};

fn one_assignment() -> Design {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    let y = d.add_signal("y", 1, 0).unwrap();
    d.root.add(
        "comb",
        [Statement::assign(y, Expr::signal(a)).at(SrcLoc::new("/t/top.py", 3))],
    );
    d
}

fn aggregate(facet: Facet, design: &mut Design, drive: impl FnOnce(&mut vigil_sim::Simulator<'_>)) -> AggregateReport {
    let inst = instrument(design, &[facet], &Namer::new()).unwrap();
    let observers = run(design, &inst, drive);
    let mut report = AggregateReport::new(facet);
    let plan = inst.plan(facet).unwrap();
    report.merge(observers[0].get_results(), &plan.descriptors);
    report
}

#[test]
fn assignment_never_simulated_is_uncovered() {
    let mut d = one_assignment();
    let report = aggregate(Facet::Statement, &mut d, |_| {});
    let s = report.summary();
    assert_eq!((s.covered, s.total), (0, 1));
    assert_eq!(s.percent, 0.0);
    assert_eq!(
        report.summary_line("test_top"),
        "[Statement coverage for test_top] 0/1 = 0.0%"
    );
}

#[test]
fn assignment_executed_once_is_covered() {
    let mut d = one_assignment();
    let report = aggregate(Facet::Statement, &mut d, |sim| sim.settle().unwrap());
    let s = report.summary();
    assert_eq!((s.covered, s.total), (1, 1));
    assert_eq!(s.percent, 100.0);
    let (_, doc) = report.emit("test_top");
    let records = doc.statements.unwrap();
    assert_eq!(records[0].hits, 1);
    assert_eq!(records[0].name, "top.py:3 | comb:y = a");
    assert_eq!(records[0].kind, "assign");
}

#[test]
fn assertion_held_through_stimulus_is_active_not_failed() {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    let b = d.add_signal("b", 1, 0).unwrap();
    d.root.add(
        "sync",
        [Statement::formal(FormalKind::Assert, Expr::signal(a).and(Expr::signal(b)).not())],
    );
    let report = aggregate(Facet::Assertion, &mut d, |sim| {
        for (va, vb) in [(0, 0), (1, 0), (0, 1)] {
            sim.set(a, va).unwrap();
            sim.set(b, vb).unwrap();
            sim.tick("sync").unwrap();
        }
        assert!(sim.assertion_failures().is_empty());
    });

    let id = report.descriptors().next().unwrap().id.clone();
    assert_eq!(report.count(&id, Outcome::True), 3);
    assert_eq!(report.count(&id, Outcome::False), 0);
    assert_eq!(report.count(&id, Outcome::Fail), 0);
    let s = report.summary();
    assert_eq!((s.covered, s.total, s.failed), (1, 1, Some(0)));
    let (_, doc) = report.emit("t");
    assert!(!doc.assertions.unwrap()[0].failed);
}

#[test]
fn violated_assertion_is_reported_failed() {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    d.root.add("comb", [Statement::formal(FormalKind::Assume, Expr::signal(a))]);
    let report = aggregate(Facet::Assertion, &mut d, |sim| {
        sim.settle().unwrap();
        sim.set(a, 1).unwrap();
        sim.settle().unwrap();
    });
    let id = report.descriptors().next().unwrap().id.clone();
    assert_eq!(report.count(&id, Outcome::True), 1);
    assert_eq!(report.count(&id, Outcome::Fail), 1);
    assert_eq!(report.summary().failed, Some(1));
}

#[test]
fn cover_directive_records_only_true() {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    d.root.add("comb", [Statement::formal(FormalKind::Cover, Expr::signal(a))]);
    let inst = instrument(&mut d, &[Facet::Assertion], &Namer::new()).unwrap();
    let outcomes: Vec<Outcome> = inst.plans[0].index.values().map(|(_, o)| *o).collect();
    assert_eq!(outcomes, vec![Outcome::True]);
}

#[test]
fn dispatch_exercised_through_first_case_only() {
    let mut d = Design::new();
    let sel = d.add_signal("sel", 2, 0).unwrap();
    let y = d.add_signal("y", 2, 0).unwrap();
    d.root.add(
        "comb",
        [Statement::switch(
            Expr::signal(sel),
            vec![
                Case::new(vec![Pattern::Value(0)], vec![Statement::assign(y, Expr::constant(1, 2))]),
                Case::new(vec![Pattern::Value(1)], vec![Statement::assign(y, Expr::constant(2, 2))]),
                Case::default_case(vec![Statement::assign(y, Expr::constant(3, 2))]),
            ],
        )],
    );
    let report = aggregate(Facet::Block, &mut d, |sim| {
        sim.settle().unwrap();
        sim.settle().unwrap();
    });

    let cases: Vec<bool> = report
        .descriptors()
        .filter(|desc| desc.name.contains("block(case:"))
        .map(|desc| report.is_covered(&desc.id))
        .collect();
    assert_eq!(cases, vec![true, false, false]);
    let pct = cases.iter().filter(|c| **c).count() as f64 / cases.len() as f64 * 100.0;
    assert_eq!(format!("{pct:.1}"), "33.3");

    // the domain root is a block of its own
    let s = report.summary();
    assert_eq!((s.covered, s.total), (2, 4));
}

#[test]
fn single_polarity_expression_is_not_covered() {
    let mut d = Design::new();
    let x = d.add_signal("x", 2, 0).unwrap();
    let y = d.add_signal("y", 1, 0).unwrap();
    d.root.add("comb", [Statement::assign(y, Expr::signal(x).equals(Expr::constant(1, 2)))]);
    let report = aggregate(Facet::Expression, &mut d, |sim| {
        sim.set(x, 1).unwrap();
        sim.settle().unwrap();
    });
    let (_, doc) = report.emit("t");
    let records = doc.expressions.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "unknown | comb:expr(x == 1)");
    assert_eq!((records[0].true_hits, records[0].false_hits), (1, 0));
    assert!(!records[0].covered);
}

#[test]
fn clocked_shadows_read_only_on_their_edge() {
    let mut d = common::controller();
    let inst = instrument(&mut d, &[Facet::Block], &Namer::new()).unwrap();
    let sel = d.find("sel").unwrap();
    let observers = run(&d, &inst, |sim| {
        sim.set(sel, 2).unwrap();
        sim.tick("sync").unwrap();
        sim.set(sel, 1).unwrap();
        sim.tick("sync").unwrap();
    });
    let plan = inst.plan(Facet::Block).unwrap();
    let mut report = AggregateReport::new(Facet::Block);
    report.merge(observers[0].get_results(), &plan.descriptors);

    let hits = |needle: &str| {
        let desc = report
            .descriptors()
            .find(|d| d.name.contains(needle))
            .unwrap_or_else(|| panic!("no block named like {needle}"));
        report.count(&desc.id, Outcome::Hit)
    };
    // each edge entered the sync root, but case `1-` only on the first
    assert_eq!(hits("ctrl.py:20 | top | sync:block(root)"), 2);
    assert_eq!(hits("ctrl.py:20 | top | sync:block(case:1-)"), 1);
    assert_eq!(hits("ctrl.py:20 | top | sync:block(case:default)"), 1);
    assert_eq!(hits("ctrl.py:22 | top | sync:block(case:default)"), 0);
}

#[test]
fn runs_merge_into_one_session() {
    let mut session = vigil_coverage::CoverageSession::new("test_ctrl", &Facet::ALL);
    for stimulus in [[0u64, 0, 0], [1, 1, 0], [0, 1, 3]] {
        let mut d = common::controller();
        let inst = session.instrument(&mut d).unwrap();
        let a = d.find("a").unwrap();
        let b = d.find("b").unwrap();
        let sel = d.find("sel").unwrap();
        let observers = run(&d, &inst, |sim| {
            sim.set(a, stimulus[0]).unwrap();
            sim.set(b, stimulus[1]).unwrap();
            sim.set(sel, stimulus[2]).unwrap();
            sim.tick("sync").unwrap();
        });
        session.finish_run(&inst, &observers);
    }
    for facet in Facet::ALL {
        let report = session.report(facet).unwrap();
        assert_eq!(report.runs(), 3);
        assert!(report.descriptors().count() > 0);
    }
    let asserts = session.report(Facet::Assertion).unwrap();
    // a = b = 1 violates ~(a & b)
    assert_eq!(asserts.summary().failed, Some(1));
}

#[test]
fn settle_between_ticks_recounts_the_last_edge() {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    let q = d.add_signal("q", 1, 0).unwrap();
    d.root.add("sync", [Statement::assign(q, Expr::signal(a))]);
    let report = aggregate(Facet::Statement, &mut d, |sim| {
        sim.tick("sync").unwrap();
        sim.settle().unwrap();
    });
    let s = report.summary();
    assert_eq!((s.covered, s.total), (1, 1));
    let (_, doc) = report.emit("test_top");
    assert_eq!(doc.statements.unwrap()[0].hits, 2);
}
