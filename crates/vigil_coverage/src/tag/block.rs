//! Block facet: each domain's root list and every case body.

use super::Tagger;
use crate::descriptor::ConstructKind;
use crate::error::CoverageError;
use crate::naming::scoped_name;
use crate::walk::{first_loc, Scope};
use vigil_tree::{DomainBody, Statement};

pub(super) fn tag_domain(
    t: &mut Tagger<'_>,
    scope: &Scope,
    body: &mut DomainBody,
) -> Result<(), CoverageError> {
    let loc = t.namer.loc(first_loc(&body.statements, t.signals));
    let name = scoped_name(&loc, &scope.path_str(), &scope.domain, "block", "root");
    let id = t.claim(&mut body.marks.block, scope);
    t.record(id, name, ConstructKind::Block);
    tag_cases(t, scope, &mut body.statements)
}

fn tag_cases(
    t: &mut Tagger<'_>,
    scope: &Scope,
    stmts: &mut [Statement],
) -> Result<(), CoverageError> {
    let path = scope.path_str();
    for stmt in stmts.iter_mut() {
        let Statement::Switch(s) = stmt else {
            continue;
        };
        for case in &mut s.cases {
            let loc = t.namer.loc(
                case.loc
                    .as_ref()
                    .or_else(|| first_loc(&case.body, t.signals))
                    .or(s.loc.as_ref()),
            );
            let detail = format!("case:{}", case.pattern_label());
            let name = scoped_name(&loc, &path, &scope.domain, "block", &detail);
            let id = t.claim(&mut case.marks.block, scope);
            t.record(id, name, ConstructKind::Block);
            tag_cases(t, scope, &mut case.body)?;
        }
    }
    Ok(())
}
