//! Statement facet: a hit shadow after each statement and at the head of
//! each case body.

use super::{hit, pending, Injector};
use crate::error::CoverageError;
use crate::walk::is_instrumentation;
use std::mem;
use vigil_common::{Facet, Outcome};
use vigil_tree::Statement;

pub(super) fn inject_list(
    inj: &mut Injector<'_>,
    stmts: Vec<Statement>,
) -> Result<Vec<Statement>, CoverageError> {
    let mut out = Vec::with_capacity(stmts.len() * 2);
    for mut stmt in stmts {
        if is_instrumentation(&stmt, inj.signals()) {
            out.push(stmt);
            continue;
        }
        if let Statement::Switch(s) = &mut stmt {
            for case in &mut s.cases {
                let body = mem::take(&mut case.body);
                let mut rebuilt = Vec::with_capacity(body.len() + 1);
                if let Some(id) = pending(&case.marks, Facet::Statement) {
                    rebuilt.push(hit(inj.shadow(&id, Outcome::Hit)?));
                    case.marks.injected.insert(Facet::Statement);
                }
                rebuilt.extend(inject_list(inj, body)?);
                case.body = rebuilt;
            }
        }
        let after = match pending(stmt.marks(), Facet::Statement) {
            Some(id) => {
                let shadow = inj.shadow(&id, Outcome::Hit)?;
                stmt.marks_mut().injected.insert(Facet::Statement);
                Some(hit(shadow))
            }
            None => None,
        };
        out.push(stmt);
        out.extend(after);
    }
    Ok(out)
}
