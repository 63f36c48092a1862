//! Designs and run helpers shared by the integration suites.

#![allow(dead_code)]

use vigil_coverage::{CoverageObserver, Instrumentation};
use vigil_sim::Simulator;
use vigil_tree::{Case, Design, Expr, FormalKind, Fragment, Pattern, SrcLoc, Statement};

/// A small controller: a combinational decode with an assertion, a clocked
/// state register updated through nested switches, and a child fragment.
pub fn controller() -> Design {
    let mut d = Design::new();
    let a = d.add_signal("a", 1, 0).unwrap();
    let b = d.add_signal("b", 1, 0).unwrap();
    let sel = d.add_signal("sel", 2, 0).unwrap();
    let y = d.add_signal("y", 1, 0).unwrap();
    let q = d.add_signal("q", 2, 0).unwrap();
    let z = d.add_signal("z", 1, 0).unwrap();

    d.root.add(
        "comb",
        [
            Statement::assign(y, Expr::signal(a).and(Expr::signal(b)).or(Expr::signal(q).slice(1, 2)))
                .at(SrcLoc::new("/work/ip/ctrl.py", 14)),
            Statement::formal(FormalKind::Assert, Expr::signal(a).and(Expr::signal(b)).not())
                .at(SrcLoc::new("/work/ip/ctrl.py", 15)),
        ],
    );
    let inner = Statement::switch(
        Expr::signal(a),
        vec![
            Case::new(vec![Pattern::Value(1)], vec![Statement::assign(q, Expr::constant(3, 2))]),
            Case::default_case(vec![Statement::assign(q, Expr::signal(q).add(Expr::constant(1, 2)))]),
        ],
    )
    .at(SrcLoc::new("/work/ip/ctrl.py", 22));
    d.root.add(
        "sync",
        [Statement::switch(
            Expr::signal(sel),
            vec![
                Case::new(vec![Pattern::Value(0)], vec![inner]),
                Case::new(vec![Pattern::bits("1-")], vec![Statement::assign(q, Expr::constant(0, 2))]),
                Case::default_case(vec![]),
            ],
        )
        .at(SrcLoc::new("/work/ip/ctrl.py", 20))],
    );
    let mut phy = Fragment::new();
    phy.add(
        "comb",
        [Statement::assign(z, Expr::signal(b).not()).at(SrcLoc::new("/work/ip/phy.py", 8))],
    );
    d.root.add_subfragment(Some("phy"), phy);
    d
}

/// Runs `drive` against a fresh simulator with one observer per facet plan
/// and returns the observers once the simulator is gone.
pub fn run<F>(design: &Design, inst: &Instrumentation, drive: F) -> Vec<CoverageObserver>
where
    F: FnOnce(&mut Simulator<'_>),
{
    let mut observers = inst.observers();
    {
        let mut sim = Simulator::new(design).unwrap();
        for obs in observers.iter_mut() {
            sim.add_observer(obs);
        }
        drive(&mut sim);
    }
    observers
}
