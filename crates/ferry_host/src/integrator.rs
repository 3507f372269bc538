//! Registration of generated modules with the host project.

use std::path::{Path, PathBuf};

use ferry_common::RuntimePaths;
use ferry_module::Module;
use tracing::{debug, info};

use crate::error::HostError;
use crate::markers::{self, MissingMarker};
use crate::templates;
use crate::write_whole_file;

/// Writes module descriptors and owns the marker region of the host's
/// registration file.
#[derive(Debug, Clone)]
pub struct HostIntegrator {
    target_file: PathBuf,
    dependencies: Vec<String>,
    runtime: RuntimePaths,
}

impl HostIntegrator {
    /// Creates an integrator for the registration file `target_file`.
    pub fn new(target_file: PathBuf, dependencies: Vec<String>, runtime: RuntimePaths) -> Self {
        Self {
            target_file,
            dependencies,
            runtime,
        }
    }

    /// Writes each module's descriptor and precompiled header, then inserts
    /// one registration line per module right after the begin marker.
    ///
    /// Expects a clean region; run [`clean`](Self::clean) first. The markers
    /// are checked before any file is written.
    pub fn inject(&self, modules: &[Module]) -> Result<(), HostError> {
        let text = read(&self.target_file)?;
        let lines: Vec<String> = modules
            .iter()
            .map(|m| templates::registration_line(&m.host_name))
            .collect();
        let updated = markers::inject_lines(&text, &lines).map_err(|missing: MissingMarker| {
            HostError::MarkerNotFound {
                path: self.target_file.clone(),
                marker: missing.token(),
            }
        })?;
        for module in modules {
            self.write_module_files(module)?;
        }
        write_whole_file(&self.target_file, &updated)?;
        info!(
            file = %self.target_file.display(),
            modules = modules.len(),
            "registered modules with host target"
        );
        Ok(())
    }

    /// Removes every line between the markers, keeping the markers.
    ///
    /// The file is left untouched if either marker is missing.
    pub fn clean(&self) -> Result<(), HostError> {
        clean_registration(&self.target_file)
    }

    /// Overwrites the descriptor and precompiled header of one module.
    fn write_module_files(&self, module: &Module) -> Result<(), HostError> {
        let descriptor =
            templates::build_descriptor(&module.host_name, &self.dependencies, &self.runtime);
        write_whole_file(&module.descriptor_path, &descriptor)?;
        write_whole_file(&module.pch_path, &templates::precompiled_header())?;
        debug!(
            module = %module.name,
            descriptor = %module.descriptor_path.display(),
            "wrote build descriptor"
        );
        Ok(())
    }
}

/// Empties the marker region of `target_file`.
///
/// Needs no runtime or descriptor settings, so it can run before a project
/// is fully configured.
pub fn clean_registration(target_file: &Path) -> Result<(), HostError> {
    let text = read(target_file)?;
    let cleaned = markers::clean_region(&text).map_err(|missing: MissingMarker| {
        HostError::MarkerNotFound {
            path: target_file.to_path_buf(),
            marker: missing.token(),
        }
    })?;
    if cleaned != text {
        write_whole_file(target_file, &cleaned)?;
    }
    info!(file = %target_file.display(), "cleaned host target registration region");
    Ok(())
}

fn read(path: &Path) -> Result<String, HostError> {
    std::fs::read_to_string(path).map_err(|e| HostError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
