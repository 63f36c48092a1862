//! Block facet: a hit shadow at the head of the domain root and of every
//! case body.

use super::{hit, pending, Injector};
use crate::error::CoverageError;
use std::mem;
use vigil_common::{Facet, Outcome};
use vigil_tree::{DomainBody, Statement};

pub(super) fn inject_domain(
    inj: &mut Injector<'_>,
    body: &mut DomainBody,
) -> Result<(), CoverageError> {
    let stmts = mem::take(&mut body.statements);
    let mut out = Vec::with_capacity(stmts.len() + 1);
    if let Some(id) = pending(&body.marks, Facet::Block) {
        out.push(hit(inj.shadow(&id, Outcome::Hit)?));
        body.marks.injected.insert(Facet::Block);
    }
    out.extend(inject_cases(inj, stmts)?);
    body.statements = out;
    Ok(())
}

fn inject_cases(
    inj: &mut Injector<'_>,
    stmts: Vec<Statement>,
) -> Result<Vec<Statement>, CoverageError> {
    let mut out = Vec::with_capacity(stmts.len());
    for mut stmt in stmts {
        if let Statement::Switch(s) = &mut stmt {
            for case in &mut s.cases {
                let body = mem::take(&mut case.body);
                let mut rebuilt = Vec::with_capacity(body.len() + 1);
                if let Some(id) = pending(&case.marks, Facet::Block) {
                    rebuilt.push(hit(inj.shadow(&id, Outcome::Hit)?));
                    case.marks.injected.insert(Facet::Block);
                }
                rebuilt.extend(inject_cases(inj, body)?);
                case.body = rebuilt;
            }
        }
        out.push(stmt);
    }
    Ok(out)
}
