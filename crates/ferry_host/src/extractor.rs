//! Staging compiled binaries as importable extension modules.

use std::path::PathBuf;

use ferry_module::Module;
use tracing::info;

use crate::error::HostError;

/// Copies one module's compiled binary to its import path.
pub fn extract_module(module: &Module) -> Result<PathBuf, HostError> {
    if !module.binary.is_file() {
        return Err(HostError::ArtifactMissing {
            module: module.name.clone(),
            path: module.binary.clone(),
        });
    }
    if let Some(dir) = module.import_path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| HostError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::copy(&module.binary, &module.import_path).map_err(|e| HostError::Io {
        path: module.import_path.clone(),
        source: e,
    })?;
    info!(
        module = %module.name,
        from = %module.binary.display(),
        to = %module.import_path.display(),
        "staged binary"
    );
    Ok(module.import_path.clone())
}

/// Stages every module, stopping at the first missing binary.
pub fn extract_artifacts(modules: &[Module]) -> Result<Vec<PathBuf>, HostError> {
    modules.iter().map(extract_module).collect()
}
