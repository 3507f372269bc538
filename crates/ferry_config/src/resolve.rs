//! Resolution of file configuration, environment, and CLI overrides into
//! the read-only settings of one pipeline run.
//!
//! Precedence is CLI override > environment variable > `ferry.toml` > default.

use std::path::{Path, PathBuf};

use ferry_common::{BuildSettings, BuildVariant, Platform, RuntimePaths, Staging};

use crate::error::ConfigError;
use crate::types::FerryConfig;

/// Environment variable overriding `host.path`.
pub const ENV_HOST_PATH: &str = "FERRY_HOST_PATH";
/// Environment variable overriding `host.variant`.
pub const ENV_HOST_CONFIG: &str = "FERRY_HOST_CONFIG";
/// Environment variable overriding `runtime.base`.
pub const ENV_RUNTIME_BASE: &str = "FERRY_RUNTIME_BASE";

/// Values supplied on the command line that take precedence over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Host engine root.
    pub host_path: Option<String>,
    /// Build variant name.
    pub variant: Option<String>,
    /// Platform name.
    pub platform: Option<String>,
    /// Stage extracted binaries beside their sources.
    pub stage_in_source: bool,
}

/// A fully resolved project: the immutable [`BuildSettings`] plus the
/// per-component options the pipeline driver needs.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    /// Project name from `[project]`.
    pub name: String,
    /// The per-run build configuration record.
    pub settings: BuildSettings,
    /// Absolute source roots to walk for modules.
    pub source_roots: Vec<PathBuf>,
    /// Source module extension.
    pub extension: String,
    /// Declaration file extension.
    pub declaration_extension: String,
    /// Host-module name prefix.
    pub prefix: String,
    /// Directory names skipped during discovery.
    pub exclude: Vec<String>,
    /// Extension compiler executable.
    pub compiler_program: String,
    /// Extension compiler argument template.
    pub compiler_args: Vec<String>,
    /// Host modules every descriptor depends on.
    pub dependencies: Vec<String>,
    /// Regenerate host project files before building.
    pub generate_project_files: bool,
    /// Build-output failure patterns.
    pub failure_patterns: Vec<String>,
    /// Absolute path of the fingerprint cache file.
    pub cache_path: PathBuf,
}

/// Resolves a loaded configuration against the project root.
///
/// `env` looks up environment variables; pass `|k| std::env::var(k).ok()` in
/// production and a closure over fixed values in tests.
pub fn resolve_project(
    config: &FerryConfig,
    project_root: &Path,
    overrides: &Overrides,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedProject, ConfigError> {
    let platform = match overrides.platform.as_deref().or(config.host.platform.as_deref()) {
        Some(name) => name.parse::<Platform>()?,
        None => Platform::current()?,
    };

    let variant = match overrides
        .variant
        .clone()
        .or_else(|| env(ENV_HOST_CONFIG))
        .or_else(|| config.host.variant.clone())
    {
        Some(name) => name.parse::<BuildVariant>()?,
        None => BuildVariant::default(),
    };

    let host_raw = overrides
        .host_path
        .clone()
        .or_else(|| env(ENV_HOST_PATH))
        .or_else(|| config.host.path.clone())
        .ok_or_else(|| ConfigError::MissingField(format!("host.path (or {ENV_HOST_PATH})")))?;
    let host_root = expand_home(&host_raw, env);
    check_host_root(&host_root)?;

    let staging = if overrides.stage_in_source {
        Staging::InSource
    } else {
        Staging::OutOfTree
    };

    Ok(ResolvedProject {
        name: config.project.name.clone(),
        settings: BuildSettings {
            platform,
            variant,
            host_root,
            host_target: config.host.target.clone(),
            project_root: project_root.to_path_buf(),
            staging,
        },
        source_roots: config
            .modules
            .roots
            .iter()
            .map(|r| project_root.join(r))
            .collect(),
        extension: config.modules.extension.clone(),
        declaration_extension: config.modules.declaration_extension.clone(),
        prefix: config.modules.prefix.clone(),
        exclude: config.modules.exclude.clone(),
        compiler_program: config.codegen.program.clone(),
        compiler_args: config.codegen.args.clone(),
        dependencies: config.host.dependencies.clone(),
        generate_project_files: config.host.generate_project_files,
        failure_patterns: config.host.failure_patterns.clone(),
        cache_path: project_root.join(&config.cache.path),
    })
}

/// Resolves and validates the embedding runtime layout for `platform`.
///
/// Only the build stages need the runtime; commands that merely inspect or
/// stage artifacts skip this check.
pub fn resolve_runtime(
    config: &FerryConfig,
    platform: Platform,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<RuntimePaths, ConfigError> {
    let rt = &config.runtime;
    let base_raw = env(ENV_RUNTIME_BASE)
        .or_else(|| rt.base.clone())
        .ok_or_else(|| {
            ConfigError::MissingField(format!("runtime.base (or {ENV_RUNTIME_BASE})"))
        })?;
    let base = expand_home(&base_raw, env);

    let include_root = base.join(&rt.include_dir);
    let header = include_root.join(&rt.header_subdir).join(&rt.probe_header);
    if !header.is_file() {
        return Err(ConfigError::RuntimeSetup {
            header,
            base,
            include_dir: rt.include_dir.clone(),
            header_subdir: rt.header_subdir.clone(),
        });
    }

    let lib_name = match platform {
        Platform::Win64 => &rt.libraries.win64,
        Platform::Mac => &rt.libraries.mac,
        Platform::Linux => &rt.libraries.linux,
    };

    Ok(RuntimePaths {
        include_root,
        header_subdir: rt.header_subdir.clone(),
        lib_dir: base.join(&rt.lib_dir),
        lib_name: lib_name.clone(),
    })
}

/// Expands a leading `~` to the home directory when it is known.
///
/// `HOME` from `env` wins; otherwise the platform home directory is used.
fn expand_home(raw: &str, env: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            let home = env("HOME").map(PathBuf::from).or_else(dirs::home_dir);
            if let Some(home) = home {
                let rest = rest.trim_start_matches(['/', '\\']);
                return if rest.is_empty() { home } else { home.join(rest) };
            }
        }
    }
    PathBuf::from(raw)
}

/// Checks that the host root exists and contains an `Engine` directory.
fn check_host_root(root: &Path) -> Result<(), ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::HostNotFound {
            path: root.to_path_buf(),
            reason: "directory does not exist".to_string(),
        });
    }
    if !root.join("Engine").is_dir() {
        return Err(ConfigError::HostNotFound {
            path: root.to_path_buf(),
            reason: "no Engine directory found".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn host_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Engine")).unwrap();
        dir
    }

    fn config_with_host(host: &Path, extra: &str) -> FerryConfig {
        let toml = format!(
            "[project]\nname = \"t\"\n\n[host]\npath = \"{}\"\nplatform = \"Mac\"\n{extra}",
            host.display()
        );
        load_config_from_str(&toml).unwrap()
    }

    #[test]
    fn resolve_defaults() {
        let host = host_dir();
        let config = config_with_host(host.path(), "");
        let resolved =
            resolve_project(&config, Path::new("/proj"), &Overrides::default(), &no_env).unwrap();

        assert_eq!(resolved.settings.platform, Platform::Mac);
        assert_eq!(resolved.settings.variant, BuildVariant::Development);
        assert_eq!(resolved.settings.staging, Staging::OutOfTree);
        assert_eq!(resolved.settings.host_target, "UE4Editor");
        assert_eq!(resolved.source_roots, vec![PathBuf::from("/proj/src")]);
        assert_eq!(
            resolved.cache_path,
            PathBuf::from("/proj/.cache/module_fingerprints.json")
        );
    }

    #[test]
    fn cli_overrides_env_overrides_file() {
        let host = host_dir();
        let config = config_with_host(host.path(), "variant = \"Development\"\n");
        let env = |k: &str| (k == ENV_HOST_CONFIG).then(|| "Debug".to_string());

        let from_env =
            resolve_project(&config, Path::new("/p"), &Overrides::default(), &env).unwrap();
        assert_eq!(from_env.settings.variant, BuildVariant::Debug);

        let overrides = Overrides {
            variant: Some("Development".to_string()),
            platform: Some("Win64".to_string()),
            stage_in_source: true,
            ..Overrides::default()
        };
        let from_cli = resolve_project(&config, Path::new("/p"), &overrides, &env).unwrap();
        assert_eq!(from_cli.settings.variant, BuildVariant::Development);
        assert_eq!(from_cli.settings.platform, Platform::Win64);
        assert_eq!(from_cli.settings.staging, Staging::InSource);
    }

    #[test]
    fn host_path_from_env() {
        let host = host_dir();
        let config = load_config_from_str("[project]\nname = \"t\"\n[host]\nplatform = \"Linux\"\n")
            .unwrap();
        let host_str = host.path().display().to_string();
        let env = move |k: &str| (k == ENV_HOST_PATH).then(|| host_str.clone());
        let resolved =
            resolve_project(&config, Path::new("/p"), &Overrides::default(), &env).unwrap();
        assert_eq!(resolved.settings.host_root, host.path());
    }

    #[test]
    fn missing_host_path_errors() {
        let config = load_config_from_str("[project]\nname = \"t\"\n[host]\nplatform = \"Mac\"\n")
            .unwrap();
        let err = resolve_project(&config, Path::new("/p"), &Overrides::default(), &no_env)
            .unwrap_err();
        assert!(err.to_string().contains(ENV_HOST_PATH));
    }

    #[test]
    fn host_without_engine_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_host(dir.path(), "");
        let err = resolve_project(&config, Path::new("/p"), &Overrides::default(), &no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::HostNotFound { .. }));
        assert!(err.to_string().contains("no Engine directory"));
    }

    #[test]
    fn unsupported_platform_errors() {
        let host = host_dir();
        let config = config_with_host(host.path(), "");
        let overrides = Overrides {
            platform: Some("Android".to_string()),
            ..Overrides::default()
        };
        let err = resolve_project(&config, Path::new("/p"), &overrides, &no_env).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedPlatform(_)));
    }

    #[test]
    fn unknown_variant_errors() {
        let host = host_dir();
        let config = config_with_host(host.path(), "variant = \"Shipping\"\n");
        let err = resolve_project(&config, Path::new("/p"), &Overrides::default(), &no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant(_)));
    }

    #[test]
    fn home_expansion() {
        let vars: HashMap<&str, &str> = [("HOME", "/home/dev")].into_iter().collect();
        let env = |k: &str| vars.get(k).map(|v| v.to_string());
        assert_eq!(
            expand_home("~/UnrealEngine", &env),
            PathBuf::from("/home/dev/UnrealEngine")
        );
        assert_eq!(expand_home("~other/x", &env), PathBuf::from("~other/x"));
        assert_eq!(expand_home("/abs", &env), PathBuf::from("/abs"));
        assert_eq!(expand_home("~", &env), PathBuf::from("/home/dev"));
    }

    #[test]
    fn home_expansion_falls_back_to_platform_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_home("~/UnrealEngine", &no_env), home.join("UnrealEngine"));
    }

    #[test]
    fn runtime_resolves_when_set_up() {
        let base = tempfile::tempdir().unwrap();
        let headers = base.path().join("include_ferry").join("Python");
        std::fs::create_dir_all(&headers).unwrap();
        std::fs::write(headers.join("Python.h"), "").unwrap();

        let toml = format!(
            "[project]\nname = \"t\"\n[runtime]\nbase = \"{}\"\n",
            base.path().display()
        );
        let config = load_config_from_str(&toml).unwrap();
        let rt = resolve_runtime(&config, Platform::Mac, &no_env).unwrap();
        assert_eq!(rt.include_root, base.path().join("include_ferry"));
        assert_eq!(rt.lib_dir, base.path().join("lib"));
        assert_eq!(rt.lib_name, "libpython2.7.dylib");
    }

    #[test]
    fn runtime_without_probe_header_errors() {
        let base = tempfile::tempdir().unwrap();
        let toml = format!(
            "[project]\nname = \"t\"\n[runtime]\nbase = \"{}\"\n",
            base.path().display()
        );
        let config = load_config_from_str(&toml).unwrap();
        let err = resolve_runtime(&config, Platform::Win64, &no_env).unwrap_err();
        assert!(matches!(err, ConfigError::RuntimeSetup { .. }));
    }

    #[test]
    fn runtime_missing_base_errors() {
        let config = load_config_from_str("[project]\nname = \"t\"\n").unwrap();
        let err = resolve_runtime(&config, Platform::Linux, &no_env).unwrap_err();
        assert!(err.to_string().contains(ENV_RUNTIME_BASE));
    }
}
