//! Parsing, validation, and resolution of `ferry.toml` project configuration.
//!
//! This crate reads the project configuration file, produces a strongly-typed
//! [`FerryConfig`], and resolves it together with environment and command-line
//! overrides into the read-only settings a pipeline run consumes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_project, resolve_runtime, Overrides, ResolvedProject};
pub use types::*;
