//! Pipeline failure reporting.

use std::fmt;

use ferry_cache::CacheError;
use ferry_codegen::CodegenError;
use ferry_host::HostError;
use ferry_module::ModuleError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Walk the source roots.
    Discover,
    /// Compute the dirty set.
    FilterDirty,
    /// Treat every module as dirty.
    SkipFilter,
    /// Run the extension compiler.
    Generate,
    /// Write descriptors and register modules with the host.
    Integrate,
    /// Regenerate host project files.
    ProjectFiles,
    /// Run the host build tool.
    InvokeBuild,
    /// Record fingerprints of rebuilt modules.
    PersistFingerprints,
    /// Stage compiled binaries.
    Extract,
}

impl Stage {
    /// Human-readable stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Discover => "discover",
            Stage::FilterDirty => "filter-dirty",
            Stage::SkipFilter => "skip-filter",
            Stage::Generate => "generate",
            Stage::Integrate => "integrate",
            Stage::ProjectFiles => "project-files",
            Stage::InvokeBuild => "invoke-build",
            Stage::PersistFingerprints => "persist-fingerprints",
            Stage::Extract => "extract",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The component failure behind a [`PipelineError`].
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Discovery or path derivation failed.
    #[error(transparent)]
    Module(#[from] ModuleError),
    /// Fingerprinting or the fingerprint cache failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The extension compiler failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    /// A host project operation failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// A run that ended in the terminal failed state.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// The stage that failed.
    pub stage: Stage,
    /// What went wrong.
    pub source: StageError,
}

impl PipelineError {
    /// Wraps a component error raised in `stage`.
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
