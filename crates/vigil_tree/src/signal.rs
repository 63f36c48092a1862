//! Signal declarations.

use crate::ids::SignalId;
use serde::{Deserialize, Serialize};
use vigil_common::Value;

/// Who owns a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A signal of the design itself.
    Wire,
    /// Auxiliary 1-bit observation state created by coverage instrumentation.
    /// Shadow signals never feed back into design logic.
    Shadow,
}

/// A named signal in the design's global signal table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The signal's ID in the table.
    pub id: SignalId,
    /// The signal's name.
    pub name: String,
    /// Bit width, 1..=64.
    pub width: u32,
    /// Initial (and combinational default) value.
    pub init: Value,
    /// Ownership of the signal.
    pub kind: SignalKind,
}

impl Signal {
    /// Returns `true` for instrumentation-owned signals.
    pub fn is_shadow(&self) -> bool {
        self.kind == SignalKind::Shadow
    }
}
