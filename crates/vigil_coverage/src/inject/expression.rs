//! Expression facet: a true and a false shadow per decision, placed before
//! the statement that evaluates it.

use super::{pending_all, record, Injector};
use crate::error::CoverageError;
use crate::tag::decisions;
use crate::walk::is_instrumentation;
use std::mem;
use vigil_common::{Facet, Outcome};
use vigil_tree::Statement;

pub(super) fn inject_list(
    inj: &mut Injector<'_>,
    stmts: Vec<Statement>,
) -> Result<Vec<Statement>, CoverageError> {
    let mut out = Vec::with_capacity(stmts.len());
    for mut stmt in stmts {
        if is_instrumentation(&stmt, inj.signals()) {
            out.push(stmt);
            continue;
        }
        let found = decisions(&stmt, inj.signals())?;
        let ids = pending_all(stmt.marks());
        for (id, decision) in ids.iter().zip(found) {
            let expr = decision.expr;
            out.push(record(inj.shadow(id, Outcome::True)?, expr.clone()));
            out.push(record(inj.shadow(id, Outcome::False)?, expr.not()));
        }
        if !ids.is_empty() {
            stmt.marks_mut().injected.insert(Facet::Expression);
        }
        if let Statement::Switch(s) = &mut stmt {
            for case in &mut s.cases {
                let body = mem::take(&mut case.body);
                case.body = inject_list(inj, body)?;
            }
        }
        out.push(stmt);
    }
    Ok(out)
}
