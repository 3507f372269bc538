//! Everything ferry does to the host engine checkout.
//!
//! - [`HostIntegrator`] writes per-module build descriptors and precompiled
//!   headers, and maintains the marker-delimited registration region of the
//!   editor target file.
//! - [`BuildInvoker`] runs the host build tool and streams its output.
//! - [`extract_artifacts`] copies compiled binaries to their import location.
//!
//! The host files outside the marker region are opaque text and are never
//! parsed.

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod integrator;
pub mod invoker;
pub mod markers;
pub mod templates;

pub use error::HostError;
pub use extractor::{extract_artifacts, extract_module};
pub use integrator::{clean_registration, HostIntegrator};
pub use invoker::{BuildInvoker, BuildOutput};
pub use markers::{BEGIN_MARKER, END_MARKER};

use std::path::Path;

/// Replaces a file's content through a sibling temporary file and a rename.
pub(crate) fn write_whole_file(path: &Path, content: &str) -> Result<(), HostError> {
    let io_err = |p: &Path| {
        let p = p.to_path_buf();
        move |e: std::io::Error| HostError::Io { path: p, source: e }
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    let tmp = path.with_extension("ferry-tmp");
    std::fs::write(&tmp, content).map_err(io_err(&tmp))?;
    std::fs::rename(&tmp, path).map_err(io_err(path))
}
