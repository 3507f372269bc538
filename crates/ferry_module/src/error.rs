//! Error types for module discovery and path derivation.

use std::path::PathBuf;

use ferry_common::InvalidModuleName;

/// Errors raised while discovering modules or deriving their paths.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// A source root could not be walked.
    #[error("failed to discover modules under {}: {message}", path.display())]
    Discovery {
        /// The path that could not be read.
        path: PathBuf,
        /// Description of the underlying failure.
        message: String,
    },

    /// A source path handed to [`Module::new`](crate::Module::new) is not a file.
    #[error("module source {} does not exist", path.display())]
    MissingSource {
        /// The rejected source path.
        path: PathBuf,
    },

    /// Two source files map to the same module identity or host-module name.
    #[error(
        "modules {} and {} both map to '{name}'; rename one of them",
        first.display(),
        second.display()
    )]
    NameCollision {
        /// The colliding name.
        name: String,
        /// The source discovered first.
        first: PathBuf,
        /// The source discovered second.
        second: PathBuf,
    },

    /// A module identity does not derive a valid host identifier.
    #[error(transparent)]
    InvalidName(#[from] InvalidModuleName),

    /// A module source lies outside the project root, so it has no mirrored
    /// out-of-tree staging location.
    #[error("module source {} is outside the project root {}", path.display(), root.display())]
    OutsideProject {
        /// The module source.
        path: PathBuf,
        /// The project root.
        root: PathBuf,
    },
}
