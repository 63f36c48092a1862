//! The step-notification contract between the engine and its observers.

use vigil_common::Value;
use vigil_tree::SignalId;

/// Read-only access to the current signal values.
pub trait SignalState {
    /// Returns the current value of a signal.
    ///
    /// IDs outside the design's signal table read as a 1-bit zero.
    fn get(&self, id: SignalId) -> Value;
}

/// Receives one notification per settled evaluation step.
///
/// Observers see state only through [`SignalState`], so they cannot perturb
/// the run they observe.
pub trait StepObserver {
    /// Called once the step's values have settled.
    fn on_step(&mut self, state: &dyn SignalState);
}

/// A [`SignalState`] over a slice of values indexed by raw signal ID.
pub struct StateView<'a> {
    values: &'a [Value],
}

impl<'a> StateView<'a> {
    /// Wraps a value slice.
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }
}

impl SignalState for StateView<'_> {
    fn get(&self, id: SignalId) -> Value {
        self.values
            .get(id.as_raw() as usize)
            .copied()
            .unwrap_or_else(|| Value::zero(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl StepObserver for Counter {
        fn on_step(&mut self, state: &dyn SignalState) {
            if state.get(SignalId::from_raw(0)).is_true() {
                self.0 += 1;
            }
        }
    }

    #[test]
    fn view_reads_by_raw_id() {
        let values = [Value::new(1, 1), Value::new(9, 4)];
        let view = StateView::new(&values);
        assert_eq!(view.get(SignalId::from_raw(1)), Value::new(9, 4));
        assert_eq!(view.get(SignalId::from_raw(5)), Value::zero(1));
    }

    #[test]
    fn observer_sees_state() {
        let values = [Value::new(1, 1)];
        let mut c = Counter(0);
        c.on_step(&StateView::new(&values));
        c.on_step(&StateView::new(&values));
        assert_eq!(c.0, 2);
    }
}
