//! The simulation engine: a state store, settle and clock-edge steps, and
//! observer notification.
//!
//! The engine flattens the fragment hierarchy at construction time into one
//! list of combinational bodies and one list of bodies per clock domain.
//! Stimulus is applied with [`Simulator::set`]; every call to
//! [`Simulator::settle`] or [`Simulator::tick`] ends in exactly one settled
//! step, which is reported to every registered [`StepObserver`] in
//! registration order.

use std::collections::BTreeMap;

use vigil_common::Value;
use vigil_tree::{Design, Fragment, SignalId, Statement};

use crate::error::SimError;
use crate::evaluator::{exec_block, EvalContext, PendingUpdate};
use crate::observer::{SignalState, StateView, StepObserver};
use crate::SimConfig;

/// A two-state, cycle-based simulator over a borrowed [`Design`].
///
/// Observers are borrowed for the simulator's lifetime, so their results can
/// be read back once the simulator is dropped at the end of a run.
pub struct Simulator<'a> {
    design: &'a Design,
    /// Combinational bodies in fragment pre-order.
    comb: Vec<&'a [Statement]>,
    /// Clocked bodies per domain, in fragment pre-order.
    clocked: BTreeMap<String, Vec<&'a [Statement]>>,
    /// Domain driving each assigned signal.
    drivers: BTreeMap<SignalId, String>,
    /// Targets of combinational assignments; these fall back to their init
    /// value at every evaluation unless written.
    comb_targets: Vec<SignalId>,
    values: Vec<Value>,
    observers: Vec<&'a mut dyn StepObserver>,
    max_deltas: u32,
    assertion_failures: Vec<String>,
    steps: u64,
    total_deltas: u64,
}

impl<'a> Simulator<'a> {
    /// Creates a simulator with default limits.
    pub fn new(design: &'a Design) -> Result<Self, SimError> {
        Self::with_config(design, &SimConfig::default())
    }

    /// Creates a simulator, validating the design first.
    pub fn with_config(design: &'a Design, config: &SimConfig) -> Result<Self, SimError> {
        design.validate()?;

        let mut sim = Self {
            design,
            comb: Vec::new(),
            clocked: BTreeMap::new(),
            drivers: BTreeMap::new(),
            comb_targets: Vec::new(),
            values: design.signals.values().map(|s| s.init).collect(),
            observers: Vec::new(),
            max_deltas: config.max_deltas,
            assertion_failures: Vec::new(),
            steps: 0,
            total_deltas: 0,
        };
        sim.flatten(&design.root)?;
        sim.comb_targets = sim
            .drivers
            .iter()
            .filter(|(_, d)| d.as_str() == vigil_tree::Domain::COMB)
            .map(|(id, _)| *id)
            .collect();

        tracing::debug!(
            signals = design.signals.len(),
            comb_bodies = sim.comb.len(),
            clock_domains = sim.clocked.len(),
            "simulator ready"
        );
        Ok(sim)
    }

    fn flatten(&mut self, fragment: &'a Fragment) -> Result<(), SimError> {
        for body in &fragment.domains {
            let domain = body.domain.as_str();
            self.record_drivers(domain, &body.statements)?;
            if body.domain.is_comb() {
                self.comb.push(&body.statements);
            } else {
                self.clocked
                    .entry(domain.to_string())
                    .or_default()
                    .push(&body.statements);
            }
        }
        for sub in &fragment.subfragments {
            self.flatten(&sub.fragment)?;
        }
        Ok(())
    }

    fn record_drivers(&mut self, domain: &str, stmts: &[Statement]) -> Result<(), SimError> {
        for stmt in stmts {
            match stmt {
                Statement::Assign(a) => match self.drivers.get(&a.target) {
                    Some(first) if first != domain => {
                        return Err(SimError::MultipleDrivers {
                            name: self.design.signal_name(a.target),
                            first: first.clone(),
                            second: domain.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        self.drivers.insert(a.target, domain.to_string());
                    }
                },
                Statement::Switch(s) => {
                    for case in &s.cases {
                        self.record_drivers(domain, &case.body)?;
                    }
                }
                Statement::Formal(_) => {}
            }
        }
        Ok(())
    }

    /// Sets the maximum number of delta iterations per settle.
    pub fn set_max_deltas(&mut self, max: u32) {
        self.max_deltas = max;
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: &'a mut dyn StepObserver) {
        self.observers.push(observer);
    }

    /// Applies stimulus to a signal the design does not drive.
    ///
    /// The value is truncated to the signal's width and takes effect at the
    /// next [`settle`](Self::settle) or [`tick`](Self::tick).
    pub fn set(&mut self, id: SignalId, bits: u64) -> Result<(), SimError> {
        let sig = self.design.signal(id).ok_or(SimError::UnknownSignal(id))?;
        if let Some(domain) = self.drivers.get(&id) {
            return Err(SimError::DrivenSignal {
                name: sig.name.clone(),
                domain: domain.clone(),
            });
        }
        let slot = self
            .values
            .get_mut(id.as_raw() as usize)
            .ok_or(SimError::UnknownSignal(id))?;
        *slot = Value::new(bits, sig.width);
        Ok(())
    }

    /// Current value of a signal; unknown IDs read as a 1-bit zero.
    pub fn get(&self, id: SignalId) -> Value {
        StateView::new(&self.values).get(id)
    }

    /// Looks up a signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.design.find(name)
    }

    /// Propagates combinational logic to a fixpoint and notifies observers.
    pub fn settle(&mut self) -> Result<(), SimError> {
        let failures = self.settle_values()?;
        self.assertion_failures.extend(failures);
        self.notify();
        Ok(())
    }

    /// Runs one active edge of a clock domain.
    ///
    /// Pending stimulus is settled first without a notification. The
    /// domain's bodies then run against the settled state, every register
    /// write is committed at once, combinational logic settles again, and
    /// observers are notified once.
    pub fn tick(&mut self, domain: &str) -> Result<(), SimError> {
        let bodies = self
            .clocked
            .get(domain)
            .cloned()
            .ok_or_else(|| SimError::UnknownDomain(domain.to_string()))?;

        self.settle_values()?;

        let mut pending: Vec<PendingUpdate> = Vec::new();
        let mut failures = Vec::new();
        let ctx = EvalContext {
            design: self.design,
            values: &self.values,
        };
        for body in bodies {
            exec_block(&ctx, body, &mut pending, &mut failures)?;
        }
        self.commit(pending);
        self.assertion_failures.extend(failures);

        let failures = self.settle_values()?;
        self.assertion_failures.extend(failures);
        self.notify();
        Ok(())
    }

    /// Evaluates combinational bodies until no value changes.
    ///
    /// Returns the formal failures seen in the converged iteration.
    fn settle_values(&mut self) -> Result<Vec<String>, SimError> {
        for _ in 0..self.max_deltas {
            let mut next = self.values.clone();
            for id in &self.comb_targets {
                if let (Some(slot), Some(sig)) =
                    (next.get_mut(id.as_raw() as usize), self.design.signal(*id))
                {
                    *slot = sig.init;
                }
            }

            let mut pending = Vec::new();
            let mut failures = Vec::new();
            let ctx = EvalContext {
                design: self.design,
                values: &self.values,
            };
            for body in &self.comb {
                exec_block(&ctx, body, &mut pending, &mut failures)?;
            }
            apply(&mut next, pending);
            self.total_deltas += 1;

            if next == self.values {
                tracing::trace!(total_deltas = self.total_deltas, "settled");
                return Ok(failures);
            }
            self.values = next;
        }
        Err(SimError::DeltaCycleLimit {
            max_deltas: self.max_deltas,
        })
    }

    fn commit(&mut self, pending: Vec<PendingUpdate>) {
        apply(&mut self.values, pending);
    }

    fn notify(&mut self) {
        self.steps += 1;
        let view = StateView::new(&self.values);
        for observer in self.observers.iter_mut() {
            observer.on_step(&view);
        }
    }

    /// Formal failures collected so far, in the order they occurred.
    pub fn assertion_failures(&self) -> &[String] {
        &self.assertion_failures
    }

    /// Number of settled steps reported to observers.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total delta iterations executed.
    pub fn total_deltas(&self) -> u64 {
        self.total_deltas
    }
}

fn apply(values: &mut [Value], pending: Vec<PendingUpdate>) {
    for update in pending {
        if let Some(slot) = values.get_mut(update.target.as_raw() as usize) {
            *slot = update.value;
        }
    }
}

impl SignalState for Simulator<'_> {
    fn get(&self, id: SignalId) -> Value {
        Simulator::get(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_tree::{Case, Expr, FormalKind, Pattern};

    #[derive(Default)]
    struct Recorder {
        watched: Vec<SignalId>,
        seen: Vec<Vec<u64>>,
    }

    impl StepObserver for Recorder {
        fn on_step(&mut self, state: &dyn SignalState) {
            self.seen
                .push(self.watched.iter().map(|id| state.get(*id).as_u64()).collect());
        }
    }

    fn and_gate() -> (Design, SignalId, SignalId, SignalId) {
        let mut d = Design::new();
        let a = d.add_signal("a", 1, 0).unwrap();
        let b = d.add_signal("b", 1, 0).unwrap();
        let y = d.add_signal("y", 1, 0).unwrap();
        d.root
            .add("comb", [Statement::assign(y, Expr::signal(a).and(Expr::signal(b)))]);
        (d, a, b, y)
    }

    #[test]
    fn combinational_propagation() {
        let (d, a, b, y) = and_gate();
        let mut sim = Simulator::new(&d).unwrap();
        sim.set(a, 1).unwrap();
        sim.set(b, 1).unwrap();
        sim.settle().unwrap();
        assert_eq!(sim.get(y), Value::from_bool(true));
        sim.set(b, 0).unwrap();
        sim.settle().unwrap();
        assert_eq!(sim.get(y), Value::from_bool(false));
        assert_eq!(sim.steps(), 2);
    }

    #[test]
    fn driven_signal_rejects_stimulus() {
        let (d, _, _, y) = and_gate();
        let mut sim = Simulator::new(&d).unwrap();
        assert!(matches!(
            sim.set(y, 1),
            Err(SimError::DrivenSignal { .. })
        ));
        assert!(matches!(
            sim.set(SignalId::from_raw(40), 1),
            Err(SimError::UnknownSignal(_))
        ));
    }

    #[test]
    fn comb_target_falls_back_to_init() {
        let mut d = Design::new();
        let en = d.add_signal("en", 1, 0).unwrap();
        let y = d.add_signal("y", 4, 9).unwrap();
        d.root.add(
            "comb",
            [Statement::switch(
                Expr::signal(en),
                vec![Case::new(
                    vec![Pattern::Value(1)],
                    vec![Statement::assign(y, Expr::constant(3, 4))],
                )],
            )],
        );
        let mut sim = Simulator::new(&d).unwrap();
        sim.set(en, 1).unwrap();
        sim.settle().unwrap();
        assert_eq!(sim.get(y).as_u64(), 3);
        sim.set(en, 0).unwrap();
        sim.settle().unwrap();
        assert_eq!(sim.get(y).as_u64(), 9);
    }

    #[test]
    fn register_holds_between_ticks() {
        let mut d = Design::new();
        let en = d.add_signal("en", 1, 0).unwrap();
        let count = d.add_signal("count", 4, 0).unwrap();
        d.root.add(
            "sync",
            [Statement::switch(
                Expr::signal(en),
                vec![Case::new(
                    vec![Pattern::Value(1)],
                    vec![Statement::assign(
                        count,
                        Expr::signal(count).add(Expr::constant(1, 4)),
                    )],
                )],
            )],
        );
        let mut sim = Simulator::new(&d).unwrap();
        sim.set(en, 1).unwrap();
        sim.tick("sync").unwrap();
        sim.tick("sync").unwrap();
        sim.set(en, 0).unwrap();
        sim.tick("sync").unwrap();
        assert_eq!(sim.get(count).as_u64(), 2);
        assert_eq!(sim.steps(), 3);
    }

    #[test]
    fn tick_reads_settled_stimulus() {
        let mut d = Design::new();
        let a = d.add_signal("a", 1, 0).unwrap();
        let na = d.add_signal("na", 1, 0).unwrap();
        let q = d.add_signal("q", 1, 0).unwrap();
        d.root.add("comb", [Statement::assign(na, Expr::signal(a).not())]);
        d.root.add("sync", [Statement::assign(q, Expr::signal(na))]);
        let mut sim = Simulator::new(&d).unwrap();
        sim.set(a, 0).unwrap();
        sim.tick("sync").unwrap();
        assert_eq!(sim.get(q).as_u64(), 1);
    }

    #[test]
    fn combinational_loop_hits_delta_limit() {
        let mut d = Design::new();
        let y = d.add_signal("y", 1, 0).unwrap();
        d.root.add("comb", [Statement::assign(y, Expr::signal(y).not())]);
        let mut sim = Simulator::new(&d).unwrap();
        sim.set_max_deltas(8);
        assert!(matches!(
            sim.settle(),
            Err(SimError::DeltaCycleLimit { max_deltas: 8 })
        ));
    }

    #[test]
    fn unknown_domain_rejected() {
        let (d, ..) = and_gate();
        let mut sim = Simulator::new(&d).unwrap();
        assert!(matches!(sim.tick("comb"), Err(SimError::UnknownDomain(_))));
        assert!(matches!(sim.tick("pix"), Err(SimError::UnknownDomain(_))));
    }

    #[test]
    fn multiple_drivers_rejected() {
        let mut d = Design::new();
        let y = d.add_signal("y", 1, 0).unwrap();
        d.root.add("comb", [Statement::assign(y, Expr::constant(0, 1))]);
        let mut child = Fragment::new();
        child.add("sync", [Statement::assign(y, Expr::constant(1, 1))]);
        d.root.add_subfragment(Some("child"), child);
        assert!(matches!(
            Simulator::new(&d),
            Err(SimError::MultipleDrivers { .. })
        ));
    }

    #[test]
    fn observers_notified_once_per_step() {
        let (d, a, b, y) = and_gate();
        let mut first = Recorder {
            watched: vec![y],
            ..Default::default()
        };
        let mut second = Recorder {
            watched: vec![a, b],
            ..Default::default()
        };
        {
            let mut sim = Simulator::new(&d).unwrap();
            sim.add_observer(&mut first);
            sim.add_observer(&mut second);
            sim.set(a, 1).unwrap();
            sim.set(b, 1).unwrap();
            sim.settle().unwrap();
            sim.set(a, 0).unwrap();
            sim.settle().unwrap();
        }
        assert_eq!(first.seen, vec![vec![1], vec![0]]);
        assert_eq!(second.seen, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn zero_steps_means_zero_notifications() {
        let (d, ..) = and_gate();
        let mut rec = Recorder::default();
        {
            let mut sim = Simulator::new(&d).unwrap();
            sim.add_observer(&mut rec);
        }
        assert!(rec.seen.is_empty());
    }

    #[test]
    fn assertion_failures_counted_per_step() {
        let (mut d, a, b, _) = and_gate();
        d.root.add(
            "comb",
            [Statement::formal(
                FormalKind::Assert,
                Expr::signal(a).and(Expr::signal(b)).not(),
            )],
        );
        let mut sim = Simulator::new(&d).unwrap();
        sim.settle().unwrap();
        assert!(sim.assertion_failures().is_empty());
        sim.set(a, 1).unwrap();
        sim.set(b, 1).unwrap();
        sim.settle().unwrap();
        assert_eq!(sim.assertion_failures(), ["assert failed at unknown"]);
    }

    #[test]
    fn invalid_design_rejected() {
        let mut d = Design::new();
        let a = d.add_signal("a", 2, 0).unwrap();
        d.root.add(
            "comb",
            [Statement::switch(Expr::signal(a), vec![Case::new(vec![], vec![])])],
        );
        assert!(matches!(Simulator::new(&d), Err(SimError::Structural(_))));
    }
}
