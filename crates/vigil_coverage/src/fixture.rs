//! Shared test design.

use vigil_tree::{Case, Design, Expr, FormalKind, Fragment, Pattern, SrcLoc, Statement};

/// A design exercising every facet: a comb assignment and assertion, a sync
/// switch with a nested switch, and a named subfragment.
pub(crate) fn sample() -> Design {
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
            Statement::assign(y, Expr::signal(a).and(Expr::signal(b)))
                .at(SrcLoc::new("/ip/core.py", 10)),
            Statement::formal(FormalKind::Assert, Expr::signal(a).and(Expr::signal(b)).not())
                .at(SrcLoc::new("/ip/core.py", 11)),
        ],
    );
    let inner = Statement::switch(
        Expr::signal(a),
        vec![Case::new(
            vec![Pattern::Value(1)],
            vec![Statement::assign(q, Expr::constant(3, 2))],
        )],
    )
    .at(SrcLoc::new("/ip/core.py", 22));
    d.root.add(
        "sync",
        [Statement::switch(
            Expr::signal(sel),
            vec![
                Case::new(vec![Pattern::Value(0)], vec![inner]),
                Case::new(
                    vec![Pattern::bits("1-")],
                    vec![Statement::assign(q, Expr::constant(1, 2))],
                ),
                Case::default_case(vec![]),
            ],
        )
        .at(SrcLoc::new("/ip/core.py", 20))],
    );
    let mut child = Fragment::new();
    child.add("comb", [Statement::assign(z, Expr::signal(b).not())]);
    d.root.add_subfragment(Some("phy"), child);
    d
}
