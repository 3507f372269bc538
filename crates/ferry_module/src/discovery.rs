//! Module discovery: walks the declared source roots for extension sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ModuleError;
use crate::layout::HostProject;
use crate::module::Module;

/// What to look for and where.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Absolute source roots, walked in order.
    pub roots: Vec<PathBuf>,
    /// Source module extension without the dot.
    pub extension: String,
    /// Declaration file extension without the dot.
    pub declaration_extension: String,
    /// Host-module name prefix.
    pub prefix: String,
    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

/// Walks every source root and returns a [`Module`] for each source file.
///
/// Modules are returned in root order, then path order within a root. An
/// unreadable directory is an error, never a silent skip, and two sources
/// sharing an identity or a host-module name are rejected.
pub fn discover_modules(
    options: &DiscoveryOptions,
    host: &HostProject,
) -> Result<Vec<Module>, ModuleError> {
    let mut modules = Vec::new();
    for root in &options.roots {
        for source in walk_root(root, options)? {
            modules.push(Module::new(
                &source,
                &options.prefix,
                &options.declaration_extension,
                host,
            )?);
        }
    }
    check_collisions(&modules)?;

    info!(count = modules.len(), "discovered modules");
    for m in &modules {
        debug!(module = %m.name, host_name = %m.host_name, source = %m.source.display(), "module");
    }
    Ok(modules)
}

/// Collects source files under one root, skipping excluded directories.
fn walk_root(root: &Path, options: &DiscoveryOptions) -> Result<Vec<PathBuf>, ModuleError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !options
                    .exclude
                    .iter()
                    .any(|ex| entry.file_name().to_str() == Some(ex.as_str()))
        });

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ModuleError::Discovery {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str())
                == Some(options.extension.as_str())
        {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

/// Rejects two modules that map to the same identity or host-module name.
fn check_collisions(modules: &[Module]) -> Result<(), ModuleError> {
    let mut identities: HashMap<&str, &Path> = HashMap::new();
    let mut host_names: HashMap<&str, &Path> = HashMap::new();
    for m in modules {
        let keys = [
            (&mut identities, m.name.as_str()),
            (&mut host_names, m.host_name.as_str()),
        ];
        for (seen, key) in keys {
            if let Some(first) = seen.insert(key, &m.source) {
                return Err(ModuleError::NameCollision {
                    name: key.to_string(),
                    first: first.to_path_buf(),
                    second: m.source.clone(),
                });
            }
        }
    }
    Ok(())
}
