//! Change detection against the fingerprint store.

use std::fmt;

use ferry_cache::{CacheError, FingerprintStore, ModuleHasher};
use ferry_common::Fingerprint;
use ferry_module::Module;
use tracing::debug;

/// Why a module must be rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyReason {
    /// The store is empty; every module builds on the first run.
    FirstRun,
    /// The store has no entry for this module.
    NeverBuilt,
    /// Source or declaration content changed since the last build.
    Changed,
    /// Content is unchanged but the compiled binary is gone.
    ArtifactMissing,
    /// A rebuild of everything was requested.
    Forced,
}

impl fmt::Display for DirtyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirtyReason::FirstRun => "first run",
            DirtyReason::NeverBuilt => "never built",
            DirtyReason::Changed => "changed",
            DirtyReason::ArtifactMissing => "binary missing",
            DirtyReason::Forced => "forced",
        })
    }
}

/// A module with its current fingerprint and rebuild verdict.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// The module.
    pub module: Module,
    /// Fingerprint of the module's current content.
    pub fingerprint: Fingerprint,
    /// `Some` if the module is dirty.
    pub reason: Option<DirtyReason>,
}

impl Assessment {
    /// Returns `true` if the module must be rebuilt.
    pub fn is_dirty(&self) -> bool {
        self.reason.is_some()
    }
}

/// Fingerprints every module and decides whether it is dirty.
///
/// A module is dirty if its identity is absent from the store, its
/// fingerprint differs from the stored one, or its compiled binary does not
/// exist. An empty store marks everything dirty without lookups.
pub fn assess(
    modules: &[Module],
    store: &FingerprintStore,
) -> Result<Vec<Assessment>, CacheError> {
    let first_run = store.is_empty();
    modules
        .iter()
        .map(|module| -> Result<Assessment, CacheError> {
            let fingerprint =
                ModuleHasher::fingerprint(&module.source, module.declaration.as_deref())?;
            let reason = if first_run {
                Some(DirtyReason::FirstRun)
            } else {
                let stored = store.get(&module.name);
                let binary_exists = module.binary.exists();
                debug!(
                    module = %module.name,
                    known = stored.is_some(),
                    unchanged = stored == Some(&fingerprint),
                    binary_exists,
                    "dirty check"
                );
                match stored {
                    None => Some(DirtyReason::NeverBuilt),
                    Some(fp) if *fp != fingerprint => Some(DirtyReason::Changed),
                    Some(_) if !binary_exists => Some(DirtyReason::ArtifactMissing),
                    Some(_) => None,
                }
            };
            Ok(Assessment {
                module: module.clone(),
                fingerprint,
                reason,
            })
        })
        .collect()
}

/// The dirty subset of `modules`, in discovery order.
pub fn dirty_modules(
    modules: &[Module],
    store: &FingerprintStore,
) -> Result<Vec<Assessment>, CacheError> {
    Ok(assess(modules, store)?
        .into_iter()
        .filter(Assessment::is_dirty)
        .collect())
}
