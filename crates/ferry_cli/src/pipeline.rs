//! Shared helpers for CLI commands.
//!
//! Project root resolution, configuration loading, and assembly of the
//! pieces `build`, `clean`, `status`, and `extract` have in common.

use std::path::{Path, PathBuf};

use ferry_cache::FingerprintStore;
use ferry_config::{resolve_project, FerryConfig, Overrides, ResolvedProject, CONFIG_FILE};
use ferry_module::{discover_modules, DiscoveryOptions, HostProject, Module, ModuleError};

use crate::{GlobalArgs, HostArgs};

/// Version string recorded in the fingerprint cache.
pub const FERRY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A loaded and resolved project, ready for any command.
#[derive(Debug)]
pub struct Project {
    /// The parsed `ferry.toml`.
    pub config: FerryConfig,
    /// Settings after environment and command-line overrides.
    pub resolved: ResolvedProject,
    /// Host paths derived from the settings.
    pub host: HostProject,
}

impl Project {
    /// Discovery settings for this project.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            roots: self.resolved.source_roots.clone(),
            extension: self.resolved.extension.clone(),
            declaration_extension: self.resolved.declaration_extension.clone(),
            prefix: self.resolved.prefix.clone(),
            exclude: self.resolved.exclude.clone(),
        }
    }

    /// Walks the source roots.
    pub fn discover(&self) -> Result<Vec<Module>, ModuleError> {
        discover_modules(&self.discovery_options(), &self.host)
    }

    /// Loads the fingerprint cache, empty if it is absent or unusable.
    pub fn load_store(&self) -> FingerprintStore {
        FingerprintStore::load(&self.resolved.cache_path, FERRY_VERSION)
    }
}

/// Walks up from `start` looking for the nearest directory containing `ferry.toml`.
///
/// Returns the directory containing `ferry.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `ferry.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            p
        }
    } else {
        find_project_root(&std::env::current_dir()?)?
    };
    Ok(std::path::absolute(root)?)
}

/// Environment lookup used for configuration overrides.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Collects command-line overrides.
pub fn overrides(host: &HostArgs, stage_in_source: bool) -> Overrides {
    Overrides {
        host_path: host.host_path.clone(),
        variant: host.variant.clone(),
        platform: host.platform.clone(),
        stage_in_source,
    }
}

/// Finds, loads, and resolves the project for the current invocation.
pub fn load_project(
    global: &GlobalArgs,
    overrides: &Overrides,
) -> Result<Project, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    let config = ferry_config::load_config(&root)?;
    let mut resolved = resolve_project(&config, &root, overrides, &env_var)?;
    // Host tools run with the host root as working directory, so a relative
    // host path would resolve twice.
    resolved.settings.host_root = std::path::absolute(&resolved.settings.host_root)?;
    let host = HostProject::new(&resolved.settings)?;
    Ok(Project {
        config,
        resolved,
        host,
    })
}
