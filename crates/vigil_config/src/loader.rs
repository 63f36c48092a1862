//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VigilConfig;
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the configuration file inside a project directory.
pub const CONFIG_FILE: &str = "vigil.toml";

/// Loads and validates a `vigil.toml` configuration from a project directory.
///
/// Reads `<project_dir>/vigil.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<VigilConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `vigil.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VigilConfig, ConfigError> {
    let config: VigilConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks the values serde cannot: non-empty names, unique facets, limits.
fn validate_config(config: &VigilConfig) -> Result<(), ConfigError> {
    let coverage = &config.coverage;
    if coverage.label.is_empty() {
        return Err(ConfigError::EmptyLabel);
    }
    if coverage.facets.is_empty() {
        return Err(ConfigError::NoFacets);
    }
    let mut seen = BTreeSet::new();
    if let Some(&dup) = coverage.facets.iter().find(|&&f| !seen.insert(f)) {
        return Err(ConfigError::DuplicateFacet(dup));
    }
    if coverage.report_prefix.as_deref() == Some("") {
        return Err(ConfigError::EmptyReportPrefix);
    }
    if config.simulation.max_deltas == 0 {
        return Err(ConfigError::ZeroMaxDeltas);
    }
    Ok(())
}
