//! The immutable per-run build configuration record.

use std::path::PathBuf;

use crate::platform::{BuildVariant, Platform, Staging};

/// Read-only settings for one pipeline run.
///
/// Resolved once from `ferry.toml`, environment overrides, and CLI flags,
/// then passed by reference to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Platform the host toolchain builds for.
    pub platform: Platform,
    /// Host build configuration.
    pub variant: BuildVariant,
    /// Root of the host engine checkout (contains `Engine/`).
    pub host_root: PathBuf,
    /// Host editor target whose registration file receives the modules.
    pub host_target: String,
    /// Root of the project being built (contains `ferry.toml`).
    pub project_root: PathBuf,
    /// Destination for extracted binaries.
    pub staging: Staging,
}

impl BuildSettings {
    /// Returns the host `Engine` directory.
    pub fn engine_dir(&self) -> PathBuf {
        self.host_root.join("Engine")
    }
}

/// Locations of the embedding runtime's headers and link library.
///
/// The runtime's headers are reached through a disambiguating subdirectory
/// (`<include_root>/<header_subdir>/...`) so they cannot shadow host headers
/// with the same base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// Include root added to the host module's private include paths.
    pub include_root: PathBuf,
    /// Subdirectory of `include_root` that holds the runtime headers.
    pub header_subdir: String,
    /// Directory containing the runtime link library.
    pub lib_dir: PathBuf,
    /// File name of the runtime link library for the target platform.
    pub lib_name: String,
}

impl RuntimePaths {
    /// Full path to the runtime link library.
    pub fn library(&self) -> PathBuf {
        self.lib_dir.join(&self.lib_name)
    }

    /// Returns the disambiguated include spelling for `header` if the runtime
    /// ships a header of that name, e.g. `Python.h` becomes `Python/Python.h`.
    pub fn disambiguate(&self, header: &str) -> Option<String> {
        let on_disk = self.include_root.join(&self.header_subdir).join(header);
        on_disk
            .is_file()
            .then(|| format!("{}/{}", self.header_subdir, header))
    }
}
