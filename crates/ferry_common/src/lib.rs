//! Shared foundational types used across the ferry build orchestrator.
//!
//! This crate provides the content fingerprint type, platform and build-variant
//! identifiers, the immutable per-run [`BuildSettings`] record, and derivation
//! of host-module names from source module identities.

#![warn(missing_docs)]

pub mod hash;
pub mod naming;
pub mod platform;
pub mod settings;

pub use hash::{Fingerprint, ParseFingerprintError};
pub use naming::{host_module_name, is_valid_identifier, InvalidModuleName};
pub use platform::{BuildVariant, Platform, Staging, UnknownVariant, UnsupportedPlatform};
pub use settings::{BuildSettings, RuntimePaths};
