//! Structural errors in a design tree.

use crate::ids::SignalId;

/// A malformed design tree.
///
/// These fail fast: a pass that skipped a malformed node would shift the
/// identity numbering of every later sibling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// An expression or statement refers to a signal not in the table.
    #[error("unknown signal {0}")]
    UnknownSignal(SignalId),

    /// A signal or constant width outside 1..=64.
    #[error("unsupported width {width} for '{what}' (must be 1..=64)")]
    UnsupportedWidth {
        /// What carried the width.
        what: String,
        /// The offending width.
        width: u32,
    },

    /// A slice whose bounds do not fit the sliced expression.
    #[error("slice [{start}:{stop}] out of range for width {width}")]
    BadSlice {
        /// Inclusive start bit.
        start: u32,
        /// Exclusive stop bit.
        stop: u32,
        /// Width of the sliced expression.
        width: u32,
    },

    /// A case lists an explicitly empty pattern set.
    #[error("case {case} of switch at {at} has an empty pattern list")]
    EmptyPatterns {
        /// Index of the case within its switch.
        case: usize,
        /// Location of the switch.
        at: String,
    },

    /// A pattern width differs from the switch test width.
    #[error("pattern '{pattern}' has width {pattern_width}, switch test has width {test_width}")]
    PatternWidth {
        /// The pattern as written.
        pattern: String,
        /// Width implied by the pattern.
        pattern_width: u32,
        /// Width of the switch test.
        test_width: u32,
    },

    /// A bit-string pattern with characters other than `0`, `1`, `-`.
    #[error("unsupported switch pattern string '{0}'")]
    BadPattern(String),

    /// An assignment whose value is wider than its target.
    #[error("assignment to '{target}' of width {target_width} from a {value_width}-bit value")]
    AssignWidth {
        /// Name of the target signal.
        target: String,
        /// Width of the target.
        target_width: u32,
        /// Width of the value expression.
        value_width: u32,
    },

    /// A formal directive or switch test that is not a usable condition.
    #[error("formal condition at {at} must be 1 bit wide, found {width}")]
    ConditionWidth {
        /// Location of the directive.
        at: String,
        /// Width of the condition.
        width: u32,
    },

    /// A subfragment or domain name that cannot appear in a coverage id.
    #[error("{what} name '{name}' must be non-empty and contain neither '/' nor ':'")]
    BadName {
        /// `subfragment` or `domain`.
        what: &'static str,
        /// The offending name.
        name: String,
    },
}
