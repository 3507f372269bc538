//! The incremental build pipeline.
//!
//! [`dirty`] decides which discovered modules need rebuilding; [`Pipeline`]
//! runs the stages in order:
//!
//! ```text
//! Discover -> FilterDirty | SkipFilter -> [SkipBuild] -> Generate -> Integrate
//!          -> ProjectFiles -> InvokeBuild -> PersistFingerprints -> Extract -> Done
//! ```
//!
//! An empty dirty set skips straight to `Extract`. Any failure ends the run
//! with a [`PipelineError`] naming the stage; there is no resume.

#![warn(missing_docs)]

pub mod dirty;
pub mod error;
pub mod pipeline;

pub use dirty::{assess, dirty_modules, Assessment, DirtyReason};
pub use error::{PipelineError, Stage, StageError};
pub use pipeline::{Pipeline, PipelineReport};
