//! Expression facet: the 1-bit decisions inside assignments and switches.
//!
//! Every non-constant 1-bit node of an assigned value is a decision. The walk
//! descends through boolean combinators into their 1-bit operands and
//! through any node wider than one bit, so `y = (a & b) | c` yields
//! `(a & b) | c`, `a & b`, `a`, `b` and `c`, while `y = x == 3` yields only
//! the comparison. A switch contributes the boolean subexpressions of a wide
//! test, one match expression per patterned case, and a default decision
//! true when no patterned case matches.

use super::Tagger;
use crate::descriptor::ConstructKind;
use crate::error::CoverageError;
use crate::naming::decision_name;
use crate::walk::{is_instrumentation, Scope};
use vigil_common::value::mask;
use vigil_tree::{Arena, Expr, Pattern, Signal, SignalId, Statement, TreeError};

/// What a decision stands for in its statement.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DecisionRole {
    /// A subexpression of the statement.
    Expr,
    /// The match condition of the case with this pattern label.
    Case(String),
    /// No patterned case matches.
    Default,
}

/// A 1-bit expression whose true and false outcomes are counted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Decision {
    pub expr: Expr,
    pub role: DecisionRole,
}

/// The decisions of one statement, in pre-order. Case bodies are not
/// included; they hold statements of their own.
pub(crate) fn decisions(
    stmt: &Statement,
    signals: &Arena<SignalId, Signal>,
) -> Result<Vec<Decision>, TreeError> {
    let mut out = Vec::new();
    match stmt {
        Statement::Assign(a) => collect(&a.value, signals, &mut out)?,
        Statement::Switch(s) => {
            let width = s.test.width(signals)?;
            if width > 1 {
                collect(&s.test, signals, &mut out)?;
            }
            let mut any: Option<Expr> = None;
            for case in &s.cases {
                let Some(patterns) = &case.patterns else {
                    continue;
                };
                let Some(matched) = case_match(&s.test, patterns, width)? else {
                    continue;
                };
                any = Some(match any {
                    None => matched.clone(),
                    Some(prev) => prev.or(matched.clone()),
                });
                out.push(Decision {
                    expr: matched,
                    role: DecisionRole::Case(case.pattern_label()),
                });
            }
            if let Some(any) = any {
                out.push(Decision {
                    expr: any.not(),
                    role: DecisionRole::Default,
                });
            }
        }
        Statement::Formal(_) => {}
    }
    Ok(out)
}

fn collect(
    expr: &Expr,
    signals: &Arena<SignalId, Signal>,
    out: &mut Vec<Decision>,
) -> Result<(), TreeError> {
    if expr.is_const() {
        return Ok(());
    }
    if expr.width(signals)? == 1 {
        out.push(Decision {
            expr: expr.clone(),
            role: DecisionRole::Expr,
        });
        if let Some(operands) = expr.boolean_operands(signals)? {
            for operand in operands {
                collect(operand, signals, out)?;
            }
        }
    } else {
        for child in expr.children() {
            collect(child, signals, out)?;
        }
    }
    Ok(())
}

/// `test` matches any of `patterns`: `test == v` for fully specified
/// patterns, `(test & m) == v` where wildcards clear bits of `m`.
fn case_match(test: &Expr, patterns: &[Pattern], width: u32) -> Result<Option<Expr>, TreeError> {
    let mut acc: Option<Expr> = None;
    for pattern in patterns {
        let (m, v) = pattern.to_mask_value(width)?;
        let lhs = if m == mask(width) {
            test.clone()
        } else {
            test.clone().and(Expr::constant(m, width))
        };
        let eq = lhs.equals(Expr::constant(v, width));
        acc = Some(match acc {
            None => eq,
            Some(prev) => prev.or(eq),
        });
    }
    Ok(acc)
}

pub(super) fn tag_list(
    t: &mut Tagger<'_>,
    scope: &Scope,
    stmts: &mut [Statement],
) -> Result<(), CoverageError> {
    for stmt in stmts.iter_mut() {
        if is_instrumentation(stmt, t.signals) {
            continue;
        }
        let found = decisions(stmt, t.signals)?;
        let loc = t.namer.loc(stmt.loc());
        let names: Vec<String> = found
            .iter()
            .map(|d| match &d.role {
                DecisionRole::Expr => decision_name(&loc, &scope.domain, "expr", &t.render(&d.expr)),
                DecisionRole::Case(label) => decision_name(&loc, &scope.domain, "switch_case", label),
                DecisionRole::Default => {
                    decision_name(&loc, &scope.domain, "switch_default", "default")
                }
            })
            .collect();

        let marks = stmt.marks_mut();
        marks.expressions.truncate(found.len());
        for (i, name) in names.into_iter().enumerate() {
            let id = match marks.expressions.get(i) {
                Some(id) => id.clone(),
                None => {
                    let id = t.fresh_id(scope);
                    marks.expressions.push(id.clone());
                    id
                }
            };
            t.record(id, name, ConstructKind::Expr);
        }

        if let Statement::Switch(s) = stmt {
            for case in &mut s.cases {
                tag_list(t, scope, &mut case.body)?;
            }
        }
    }
    Ok(())
}
