//! Assertion facet: assert, assume and cover directives.

use super::Tagger;
use crate::descriptor::ConstructKind;
use crate::error::CoverageError;
use crate::naming::scoped_name;
use crate::walk::Scope;
use vigil_tree::Statement;

pub(super) fn tag_list(
    t: &mut Tagger<'_>,
    scope: &Scope,
    stmts: &mut [Statement],
) -> Result<(), CoverageError> {
    for stmt in stmts.iter_mut() {
        match stmt {
            Statement::Formal(f) => {
                let loc = t.namer.loc(f.loc.as_ref());
                let name = scoped_name(
                    &loc,
                    &scope.path_str(),
                    &scope.domain,
                    f.kind.as_str(),
                    &t.render(&f.condition),
                );
                let id = t.claim(&mut f.marks.assertion, scope);
                t.record(id, name, ConstructKind::from(f.kind));
            }
            Statement::Switch(s) => {
                for case in &mut s.cases {
                    tag_list(t, scope, &mut case.body)?;
                }
            }
            Statement::Assign(_) => {}
        }
    }
    Ok(())
}
