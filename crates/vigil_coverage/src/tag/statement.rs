//! Statement facet: every assignment, every switch, and every case arm.

use super::Tagger;
use crate::descriptor::ConstructKind;
use crate::error::CoverageError;
use crate::naming::{assign_name, scoped_name};
use crate::walk::{is_instrumentation, Scope};
use vigil_tree::Statement;

/// Tags a statement list. A switch takes the next number, its case arms the
/// numbers after it, and only then are the case bodies walked.
pub(super) fn tag_list(
    t: &mut Tagger<'_>,
    scope: &Scope,
    stmts: &mut [Statement],
) -> Result<(), CoverageError> {
    for stmt in stmts.iter_mut() {
        if is_instrumentation(stmt, t.signals) {
            continue;
        }
        let loc = t.namer.loc(stmt.loc());
        match stmt {
            Statement::Assign(a) => {
                let lhs = t
                    .signals
                    .get(a.target)
                    .map_or_else(|| a.target.to_string(), |s| s.name.clone());
                let name = assign_name(&loc, &scope.domain, &lhs, &t.render(&a.value));
                let id = t.claim(&mut a.marks.statement, scope);
                t.record(id, name, ConstructKind::Assign);
            }
            Statement::Switch(s) => {
                let path = scope.path_str();
                let name = scoped_name(&loc, &path, &scope.domain, "switch", &t.render(&s.test));
                let id = t.claim(&mut s.marks.statement, scope);
                t.record(id, name, ConstructKind::Switch);

                for case in &mut s.cases {
                    let case_loc = t.namer.loc(case.loc.as_ref().or(s.loc.as_ref()));
                    let name = scoped_name(
                        &case_loc,
                        &path,
                        &scope.domain,
                        "switch_case",
                        &case.pattern_label(),
                    );
                    let id = t.claim(&mut case.marks.statement, scope);
                    t.record(id, name, ConstructKind::SwitchCase);
                }
                for case in &mut s.cases {
                    tag_list(t, scope, &mut case.body)?;
                }
            }
            Statement::Formal(_) => {}
        }
    }
    Ok(())
}
