//! Source locations carried by statements and case bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The source file and line a construct was written at.
///
/// Elaborators that cannot tell where a construct came from leave it unset
/// (`None` in the owning node); descriptors then read `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrcLoc {
    /// Path of the source file as recorded by the elaborator.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl SrcLoc {
    /// Creates a location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Shortens the file path for display.
    ///
    /// With an `anchor`, everything before the first occurrence of the
    /// anchor directory name is dropped; otherwise only the last path
    /// component is kept.
    pub fn short(&self, anchor: Option<&str>) -> String {
        let file = match anchor.and_then(|a| self.file.find(a)) {
            Some(idx) => &self.file[idx..],
            None => self.file.rsplit('/').next().unwrap_or(&self.file),
        };
        format!("{file}:{}", self.line)
    }
}

impl fmt::Display for SrcLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
