//! Case patterns of a switch.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use vigil_common::value::mask;

/// One pattern a switch test is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// An exact value.
    Value(u64),
    /// A bit string, most significant bit first, where `-` is a don't-care.
    Bits(String),
}

impl Pattern {
    /// Creates a bit-string pattern.
    pub fn bits(s: impl Into<String>) -> Self {
        Pattern::Bits(s.into())
    }

    /// Resolves this pattern against a test of `width` bits into a
    /// `(mask, value)` pair: the test matches when `test & mask == value`.
    pub fn to_mask_value(&self, width: u32) -> Result<(u64, u64), TreeError> {
        match self {
            Pattern::Value(v) => {
                let needed = u64::BITS - v.leading_zeros();
                if needed > width {
                    return Err(TreeError::PatternWidth {
                        pattern: self.to_string(),
                        pattern_width: needed,
                        test_width: width,
                    });
                }
                Ok((mask(width), *v))
            }
            Pattern::Bits(s) => {
                if s.len() as u32 != width {
                    return Err(TreeError::PatternWidth {
                        pattern: s.clone(),
                        pattern_width: s.len() as u32,
                        test_width: width,
                    });
                }
                let mut m = 0u64;
                let mut v = 0u64;
                for c in s.chars() {
                    m <<= 1;
                    v <<= 1;
                    match c {
                        '0' => m |= 1,
                        '1' => {
                            m |= 1;
                            v |= 1;
                        }
                        '-' => {}
                        _ => return Err(TreeError::BadPattern(s.clone())),
                    }
                }
                Ok((m, v))
            }
        }
    }

    /// Returns `true` if all bits are don't-cares, so the pattern matches any test.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Pattern::Bits(s) if s.chars().all(|c| c == '-'))
    }

    /// Tests `bits` (a value of `width` bits) against this pattern.
    pub fn matches(&self, bits: u64, width: u32) -> Result<bool, TreeError> {
        let (m, v) = self.to_mask_value(width)?;
        Ok(bits & m == v)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Value(v) => write!(f, "{v}"),
            Pattern::Bits(s) => f.write_str(s),
        }
    }
}
