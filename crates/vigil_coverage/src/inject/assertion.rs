//! Assertion facet: outcome shadows right after each directive.
//!
//! `true` records the condition, `false` its negation. Assert and assume
//! directives also get a `fail` shadow; a cover directive cannot fail and
//! only gets `true`.

use super::{pending, record, Injector};
use crate::error::CoverageError;
use std::mem;
use vigil_common::{Facet, Outcome};
use vigil_tree::Statement;

pub(super) fn inject_list(
    inj: &mut Injector<'_>,
    stmts: Vec<Statement>,
) -> Result<Vec<Statement>, CoverageError> {
    let mut out = Vec::with_capacity(stmts.len());
    for mut stmt in stmts {
        let mut after = Vec::new();
        match &mut stmt {
            Statement::Formal(f) => {
                if let Some(id) = pending(&f.marks, Facet::Assertion) {
                    let cond = f.condition.clone();
                    after.push(record(inj.shadow(&id, Outcome::True)?, cond.clone()));
                    if f.kind.can_fail() {
                        after.push(record(inj.shadow(&id, Outcome::False)?, cond.clone().not()));
                        after.push(record(inj.shadow(&id, Outcome::Fail)?, cond.not()));
                    }
                    f.marks.injected.insert(Facet::Assertion);
                }
            }
            Statement::Switch(s) => {
                for case in &mut s.cases {
                    let body = mem::take(&mut case.body);
                    case.body = inject_list(inj, body)?;
                }
            }
            Statement::Assign(_) => {}
        }
        out.push(stmt);
        out.extend(after);
    }
    Ok(out)
}
