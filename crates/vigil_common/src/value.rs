//! Fixed-width 2-state bit vectors used for signal values and constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The widest value a signal or expression may carry.
pub const MAX_WIDTH: u32 = 64;

/// A 2-state bit vector of `width` bits (1..=64), stored LSB-first in a `u64`.
///
/// Bits above `width` are always zero. All arithmetic on values wraps at the
/// value's width, matching how registers of a fixed size behave in hardware.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    bits: u64,
    width: u32,
}

impl Value {
    /// Creates a value of the given width, truncating `bits` to fit.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or larger than [`MAX_WIDTH`].
    pub fn new(bits: u64, width: u32) -> Self {
        assert!(
            (1..=MAX_WIDTH).contains(&width),
            "value width {width} outside 1..={MAX_WIDTH}"
        );
        Self {
            bits: bits & mask(width),
            width,
        }
    }

    /// Creates an all-zero value of the given width.
    pub fn zero(width: u32) -> Self {
        Self::new(0, width)
    }

    /// Creates a single-bit value from a boolean.
    pub fn from_bool(value: bool) -> Self {
        Self::new(u64::from(value), 1)
    }

    /// Returns the raw bits.
    pub fn as_u64(self) -> u64 {
        self.bits
    }

    /// Returns the bit width.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Returns `true` if any bit is set.
    pub fn is_true(self) -> bool {
        self.bits != 0
    }

    /// Returns bit `index` (LSB = 0). Bits past the width read as zero.
    pub fn bit(self, index: u32) -> bool {
        index < self.width && (self.bits >> index) & 1 == 1
    }

    /// Returns the same bits re-sized to `width`, truncating or zero-extending.
    pub fn resize(self, width: u32) -> Self {
        Self::new(self.bits, width)
    }

    /// Returns the all-ones mask for this value's width.
    pub fn mask(self) -> u64 {
        mask(self.width)
    }
}

/// Returns a mask with the low `width` bits set.
pub fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}'d{})", self.width, self.bits)
    }
}
