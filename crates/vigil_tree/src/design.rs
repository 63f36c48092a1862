//! The top-level design: a signal table plus the root fragment.

use crate::arena::Arena;
use crate::error::TreeError;
use crate::expr::Expr;
use crate::fragment::Fragment;
use crate::ids::SignalId;
use crate::loc::SrcLoc;
use crate::signal::{Signal, SignalKind};
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};
use vigil_common::{Value, MAX_WIDTH};

/// An elaborated design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// Every signal of the design, shadows included.
    pub signals: Arena<SignalId, Signal>,
    /// The root of the fragment hierarchy.
    pub root: Fragment,
}

fn at(loc: Option<&SrcLoc>) -> String {
    loc.map_or_else(|| "unknown".to_string(), SrcLoc::to_string)
}

/// Names end up as `/`- and `:`-separated fields of a coverage id.
fn check_name(what: &'static str, name: &str) -> Result<(), TreeError> {
    if name.is_empty() || name.contains(['/', ':']) {
        return Err(TreeError::BadName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a design signal with the given initial value.
    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        width: u32,
        init: u64,
    ) -> Result<SignalId, TreeError> {
        let name = name.into();
        if width == 0 || width > MAX_WIDTH {
            return Err(TreeError::UnsupportedWidth { what: name, width });
        }
        Ok(self.signals.alloc_with(|id| Signal {
            id,
            name,
            width,
            init: Value::new(init, width),
            kind: SignalKind::Wire,
        }))
    }

    /// Declares a 1-bit, zero-initialised shadow signal.
    pub fn add_shadow(&mut self, name: impl Into<String>) -> SignalId {
        let name = name.into();
        self.signals.alloc_with(|id| Signal {
            id,
            name,
            width: 1,
            init: Value::zero(1),
            kind: SignalKind::Shadow,
        })
    }

    /// Looks up a signal by ID.
    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals.get(id)
    }

    /// Finds the first signal with the given name.
    pub fn find(&self, name: &str) -> Option<SignalId> {
        self.signals
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(id, _)| id)
    }

    /// Name of a signal, or its ID when unknown.
    pub fn signal_name(&self, id: SignalId) -> String {
        self.signals
            .get(id)
            .map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    /// Bit width of an expression.
    pub fn width_of(&self, expr: &Expr) -> Result<u32, TreeError> {
        expr.width(&self.signals)
    }

    /// Checks the whole tree for structural errors.
    pub fn validate(&self) -> Result<(), TreeError> {
        for sig in self.signals.values() {
            if sig.width == 0 || sig.width > MAX_WIDTH || sig.init.width() != sig.width {
                return Err(TreeError::UnsupportedWidth {
                    what: sig.name.clone(),
                    width: sig.width,
                });
            }
        }
        self.validate_fragment(&self.root)
    }

    fn validate_fragment(&self, fragment: &Fragment) -> Result<(), TreeError> {
        for body in &fragment.domains {
            check_name("domain", body.domain.as_str())?;
            self.validate_list(&body.statements)?;
        }
        for sub in &fragment.subfragments {
            check_name("subfragment", sub.segment())?;
            self.validate_fragment(&sub.fragment)?;
        }
        Ok(())
    }

    fn validate_list(&self, stmts: &[Statement]) -> Result<(), TreeError> {
        for stmt in stmts {
            match stmt {
                Statement::Assign(a) => {
                    let target = self
                        .signals
                        .get(a.target)
                        .ok_or(TreeError::UnknownSignal(a.target))?;
                    let value_width = self.width_of(&a.value)?;
                    if value_width > target.width {
                        return Err(TreeError::AssignWidth {
                            target: target.name.clone(),
                            target_width: target.width,
                            value_width,
                        });
                    }
                }
                Statement::Switch(s) => {
                    let width = self.width_of(&s.test)?;
                    for (i, case) in s.cases.iter().enumerate() {
                        if let Some(patterns) = &case.patterns {
                            if patterns.is_empty() {
                                return Err(TreeError::EmptyPatterns {
                                    case: i,
                                    at: at(s.loc.as_ref()),
                                });
                            }
                            for p in patterns {
                                p.to_mask_value(width)?;
                            }
                        }
                        self.validate_list(&case.body)?;
                    }
                }
                Statement::Formal(f) => {
                    let width = self.width_of(&f.condition)?;
                    if width != 1 {
                        return Err(TreeError::ConditionWidth {
                            at: at(f.loc.as_ref()),
                            width,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::stmt::{Case, FormalKind};

    #[test]
    fn add_and_find_signals() {
        let mut d = Design::new();
        let a = d.add_signal("a", 4, 3).unwrap();
        let s = d.add_shadow("stmt_x");
        assert_eq!(d.find("a"), Some(a));
        assert_eq!(d.find("stmt_x"), Some(s));
        assert!(d.signal(s).unwrap().is_shadow());
        assert_eq!(d.signal(a).unwrap().init, Value::new(3, 4));
        assert!(d.add_signal("wide", 65, 0).is_err());
    }

    #[test]
    fn valid_design_passes() {
        let mut d = Design::new();
        let a = d.add_signal("a", 2, 0).unwrap();
        let y = d.add_signal("y", 1, 0).unwrap();
        d.root.add(
            "comb",
            [Statement::switch(
                Expr::signal(a),
                vec![
                    Case::new(vec![Pattern::Value(1)], vec![Statement::assign(y, Expr::constant(1, 1))]),
                    Case::new(vec![Pattern::bits("1-")], vec![]),
                    Case::default_case(vec![]),
                ],
            )],
        );
        d.validate().unwrap();
    }

    #[test]
    fn empty_pattern_list_rejected() {
        let mut d = Design::new();
        let a = d.add_signal("a", 2, 0).unwrap();
        d.root.add(
            "comb",
            [Statement::switch(Expr::signal(a), vec![Case::new(vec![], vec![])])
                .at(SrcLoc::new("x.py", 9))],
        );
        assert_eq!(
            d.validate().unwrap_err(),
            TreeError::EmptyPatterns {
                case: 0,
                at: "x.py:9".into()
            }
        );
    }

    #[test]
    fn nested_pattern_width_rejected() {
        let mut d = Design::new();
        let a = d.add_signal("a", 2, 0).unwrap();
        let inner = Statement::switch(Expr::signal(a), vec![Case::new(vec![Pattern::bits("101")], vec![])]);
        d.root.add(
            "sync",
            [Statement::switch(
                Expr::signal(a),
                vec![Case::default_case(vec![inner])],
            )],
        );
        assert!(matches!(d.validate(), Err(TreeError::PatternWidth { .. })));
    }

    #[test]
    fn wide_assign_rejected() {
        let mut d = Design::new();
        let a = d.add_signal("a", 8, 0).unwrap();
        let y = d.add_signal("y", 4, 0).unwrap();
        d.root.add("comb", [Statement::assign(y, Expr::signal(a))]);
        assert!(matches!(d.validate(), Err(TreeError::AssignWidth { .. })));
    }

    #[test]
    fn formal_condition_must_be_one_bit() {
        let mut d = Design::new();
        let a = d.add_signal("a", 8, 0).unwrap();
        d.root.add("comb", [Statement::formal(FormalKind::Assert, Expr::signal(a))]);
        assert_eq!(
            d.validate().unwrap_err(),
            TreeError::ConditionWidth {
                at: "unknown".into(),
                width: 8
            }
        );
    }

    #[test]
    fn unknown_target_rejected() {
        let mut d = Design::new();
        d.root.add(
            "comb",
            [Statement::assign(SignalId::from_raw(7), Expr::constant(0, 1))],
        );
        assert_eq!(
            d.validate().unwrap_err(),
            TreeError::UnknownSignal(SignalId::from_raw(7))
        );
    }

    #[test]
    fn names_must_fit_coverage_ids() {
        let mut d = Design::new();
        d.root.add("clk:fast", Vec::<Statement>::new());
        assert_eq!(
            d.validate().unwrap_err(),
            TreeError::BadName {
                what: "domain",
                name: "clk:fast".into()
            }
        );

        let mut d = Design::new();
        d.root.add_subfragment(Some("u/core"), Fragment::new());
        assert!(matches!(
            d.validate(),
            Err(TreeError::BadName { what: "subfragment", .. })
        ));

        let mut d = Design::new();
        d.root.add_subfragment(Some(""), Fragment::new());
        assert!(matches!(d.validate(), Err(TreeError::BadName { .. })));

        let mut d = Design::new();
        d.root.add("", Vec::<Statement>::new());
        assert!(matches!(d.validate(), Err(TreeError::BadName { what: "domain", .. })));
    }

    #[test]
    fn serde_roundtrip() {
        let mut d = Design::new();
        let a = d.add_signal("a", 1, 0).unwrap();
        d.root.add("comb", [Statement::assign(a, Expr::constant(1, 1))]);
        let json = serde_json::to_string(&d).unwrap();
        let back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(back.root, d.root);
        assert_eq!(back.signals.len(), 1);
    }
}
