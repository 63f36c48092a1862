//! Configuration types deserialized from `vigil.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use vigil_common::Facet;

/// The top-level configuration parsed from `vigil.toml`.
#[derive(Debug, Deserialize)]
pub struct VigilConfig {
    /// What to collect and where to write it.
    pub coverage: CoverageConfig,
    /// Limits for the simulation engine.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// The `[coverage]` table.
#[derive(Debug, Deserialize)]
pub struct CoverageConfig {
    /// Label printed in summary lines and written into every report.
    pub label: String,
    /// Facets to instrument and report. Accepts a single name or a list.
    #[serde(default = "all_facets", deserialize_with = "deserialize_facets")]
    pub facets: Vec<Facet>,
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name prefix for reports; defaults to the label.
    #[serde(default)]
    pub report_prefix: Option<String>,
    /// Directory name source paths are shortened to in descriptor names.
    #[serde(default)]
    pub source_anchor: Option<String>,
}

impl CoverageConfig {
    /// The prefix report files are named with.
    pub fn report_prefix(&self) -> &str {
        self.report_prefix.as_deref().unwrap_or(&self.label)
    }
}

/// The `[simulation]` table.
#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    /// Maximum delta iterations per settle.
    #[serde(default = "default_max_deltas")]
    pub max_deltas: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_deltas: default_max_deltas(),
        }
    }
}

fn all_facets() -> Vec<Facet> {
    Facet::ALL.to_vec()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_deltas() -> u32 {
    10_000
}

/// Deserializes a facet field given either as one name or a list of names.
///
/// Allows both `facets = "block"` and `facets = ["block", "statement"]`.
fn deserialize_facets<'de, D>(deserializer: D) -> Result<Vec<Facet>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FacetOrVec;

    impl<'de> Visitor<'de> for FacetOrVec {
        type Value = Vec<Facet>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a facet name or a list of facet names")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.parse::<Facet>().map_err(E::custom)?])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(name) = seq.next_element::<String>()? {
                vec.push(name.parse::<Facet>().map_err(de::Error::custom)?);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(FacetOrVec)
}
