//! Fingerprint cache for incremental module builds.
//!
//! This crate persists a mapping from module identity to content
//! [`Fingerprint`](ferry_common::Fingerprint) and computes those fingerprints
//! by streaming a module's source and declaration files through SHA-256.

#![warn(missing_docs)]

pub mod error;
pub mod hasher;
pub mod store;

pub use error::CacheError;
pub use hasher::{hash_file, ModuleHasher};
pub use store::FingerprintStore;
