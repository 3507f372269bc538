//! Error types for host project operations.

use std::path::PathBuf;

use crate::markers::{BEGIN_MARKER, END_MARKER};

/// Errors raised while editing, building, or extracting from the host project.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The registration file lacks the marker lines ferry owns.
    #[error(
        "marker '{marker}' not found in {}\n\
         add the following lines to the module list of the editor target \
         (among the OutExtraModuleNames.Add(...) calls), then run again:\n\
         {}\n{}",
        path.display(),
        BEGIN_MARKER,
        END_MARKER
    )]
    MarkerNotFound {
        /// The registration file.
        path: PathBuf,
        /// The missing marker token.
        marker: &'static str,
    },

    /// A host file could not be read or written.
    #[error("host I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A host tool could not be started.
    #[error("failed to run `{command}`: {source}")]
    SpawnFailed {
        /// The full command line.
        command: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a host tool's output or waiting for it failed.
    #[error("lost contact with `{command}`: {source}")]
    OutputRead {
        /// The full command line.
        command: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A host tool exited with a non-zero status.
    #[error("host build failed with exit code {code}: `{command}`")]
    BuildFailed {
        /// The full command line.
        command: String,
        /// Exit code, `-1` when terminated by a signal.
        code: i32,
    },

    /// A host tool exited 0 but its output matched a failure pattern.
    #[error("host build reported an error despite exit code 0: `{command}`\n{line}")]
    BuildReported {
        /// The full command line.
        command: String,
        /// The first output line that matched.
        line: String,
    },

    /// A configured failure pattern is not a valid regular expression.
    #[error("invalid failure pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },

    /// The build claimed success but the expected binary is absent.
    #[error(
        "compiled binary for module '{module}' not found at {}; \
         the host build output does not match the configured platform and variant",
        path.display()
    )]
    ArtifactMissing {
        /// The module identity.
        module: String,
        /// The expected binary path.
        path: PathBuf,
    },
}
