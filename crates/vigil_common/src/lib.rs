//! Shared foundational types used across the Vigil coverage toolchain.
//!
//! This crate provides the 2-state bit-vector [`Value`] carried by signals and
//! expressions, the [`Facet`] and [`Outcome`] enums naming the coverage kinds,
//! and [`ContentHash`] for fingerprinting descriptor sets.

#![warn(missing_docs)]

pub mod facet;
pub mod hash;
pub mod value;

pub use facet::{Facet, Outcome};
pub use hash::{ContentHash, ContentHasher};
pub use value::{Value, MAX_WIDTH};
