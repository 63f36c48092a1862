//! Parsing and validation of `vigil.toml` coverage configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`VigilConfig`] naming the coverage facets to collect, the report label,
//! where reports are written, and the limits handed to the simulation engine.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
