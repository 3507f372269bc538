//! Module fingerprint computation.
//!
//! Each input file is streamed through SHA-256 in fixed-size blocks; the
//! per-file digests are then fed, in order, into an outer SHA-256 that yields
//! the module fingerprint. The order is source first, then declaration.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ferry_common::Fingerprint;
use sha2::{Digest, Sha256};

use crate::error::CacheError;

/// Read block size for streaming file contents into the digest.
const BLOCK_SIZE: usize = 64 * 1024;

/// Streams one file through SHA-256 and returns its digest.
pub fn hash_file(path: &Path) -> Result<Fingerprint, CacheError> {
    let io_err = |e: std::io::Error| CacheError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Fingerprint::from_raw(hasher.finalize().into()))
}

/// Combines the digests of a module's files into one fingerprint.
pub struct ModuleHasher;

impl ModuleHasher {
    /// Computes the fingerprint of a module from its source file and optional
    /// declaration file.
    pub fn fingerprint(
        source: &Path,
        declaration: Option<&Path>,
    ) -> Result<Fingerprint, CacheError> {
        let mut outer = Sha256::new();
        outer.update(hash_file(source)?.as_bytes());
        if let Some(decl) = declaration {
            outer.update(hash_file(decl)?.as_bytes());
        }
        Ok(Fingerprint::from_raw(outer.finalize().into()))
    }
}
