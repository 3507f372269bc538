//! Configuration types deserialized from `ferry.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `ferry.toml`.
#[derive(Debug, Deserialize)]
pub struct FerryConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Where and how extension source modules are discovered.
    #[serde(default)]
    pub modules: ModulesConfig,
    /// The host engine project that compiles the generated modules.
    #[serde(default)]
    pub host: HostConfig,
    /// The external extension-language compiler.
    #[serde(default)]
    pub codegen: CodegenConfig,
    /// The embedding runtime the generated code links against.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Fingerprint cache location.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Core project metadata required in every `ferry.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
}

/// Module discovery settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Source roots, relative to the project root, that are walked for modules.
    pub roots: Vec<String>,
    /// File extension of extension source modules (without the dot).
    pub extension: String,
    /// File extension of companion declaration files (without the dot).
    pub declaration_extension: String,
    /// Namespace prefix of derived host-module names.
    pub prefix: String,
    /// Directory names that are never descended into.
    pub exclude: Vec<String>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            roots: vec!["src".to_string()],
            extension: "pyx".to_string(),
            declaration_extension: "pxd".to_string(),
            prefix: "Ferry".to_string(),
            exclude: vec!["build".to_string(), ".cache".to_string(), ".git".to_string()],
        }
    }
}

/// Host engine settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Root of the host engine checkout. `FERRY_HOST_PATH` overrides this.
    pub path: Option<String>,
    /// Editor target the modules are registered with.
    pub target: String,
    /// Build configuration (`Development` or `Debug`). `FERRY_HOST_CONFIG`
    /// overrides this.
    pub variant: Option<String>,
    /// Platform to build for. Defaults to the running OS.
    pub platform: Option<String>,
    /// Host modules every generated module depends on.
    pub dependencies: Vec<String>,
    /// Whether to regenerate host project files before building.
    pub generate_project_files: bool,
    /// Regular expressions that mark a build-output line as a failure.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub failure_patterns: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            path: None,
            target: "UE4Editor".to_string(),
            variant: None,
            platform: None,
            dependencies: ["Core", "CoreUObject", "Engine", "UnrealEd"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            generate_project_files: true,
            failure_patterns: vec!["^ERROR:".to_string()],
        }
    }
}

/// External extension compiler invocation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Compiler executable name or path.
    pub program: String,
    /// Argument template; `{source}` and `{output}` are substituted.
    pub args: Vec<String>,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            program: "cython".to_string(),
            args: ["--verbose", "--cplus", "-o", "{output}", "{source}"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Embedding runtime layout.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Root directory of the runtime installation. `FERRY_RUNTIME_BASE`
    /// overrides this.
    pub base: Option<String>,
    /// Include root under `base` that holds the disambiguating subdirectory.
    pub include_dir: String,
    /// Subdirectory of the include root that mirrors the runtime headers.
    pub header_subdir: String,
    /// Header whose presence proves the include root is set up.
    pub probe_header: String,
    /// Library directory under `base`.
    pub lib_dir: String,
    /// Link library file name per platform.
    pub libraries: RuntimeLibraries,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base: None,
            include_dir: "include_ferry".to_string(),
            header_subdir: "Python".to_string(),
            probe_header: "Python.h".to_string(),
            lib_dir: "lib".to_string(),
            libraries: RuntimeLibraries::default(),
        }
    }
}

/// Runtime link library names keyed by platform.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RuntimeLibraries {
    /// Library used on Win64.
    pub win64: String,
    /// Library used on Mac.
    pub mac: String,
    /// Library used on Linux.
    pub linux: String,
}

impl Default for RuntimeLibraries {
    fn default() -> Self {
        Self {
            win64: "python27.lib".to_string(),
            mac: "libpython2.7.dylib".to_string(),
            linux: "libpython2.7.so".to_string(),
        }
    }
}

/// Fingerprint cache settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file path, relative to the project root.
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: ".cache/module_fingerprints.json".to_string(),
        }
    }
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use crate::loader::load_config_from_str;

    #[test]
    fn failure_patterns_single_string() {
        let toml = r#"
[project]
name = "test"

[host]
failure_patterns = "fatal error"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.host.failure_patterns, vec!["fatal error"]);
    }

    #[test]
    fn failure_patterns_list() {
        let toml = r#"
[project]
name = "test"

[host]
failure_patterns = ["^ERROR:", "error C\\d+"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.host.failure_patterns, vec!["^ERROR:", "error C\\d+"]);
    }

    #[test]
    fn failure_patterns_empty_list_disables_scan() {
        let toml = r#"
[project]
name = "test"

[host]
failure_patterns = []
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.host.failure_patterns.is_empty());
    }

    #[test]
    fn partial_host_section_keeps_defaults() {
        let toml = r#"
[project]
name = "test"

[host]
path = "/opt/UnrealEngine"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.host.path.as_deref(), Some("/opt/UnrealEngine"));
        assert_eq!(config.host.target, "UE4Editor");
        assert_eq!(config.host.dependencies.len(), 4);
        assert!(config.host.generate_project_files);
    }

    #[test]
    fn runtime_libraries_override() {
        let toml = r#"
[project]
name = "test"

[runtime.libraries]
linux = "libpython3.11.so"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.runtime.libraries.linux, "libpython3.11.so");
        assert_eq!(config.runtime.libraries.mac, "libpython2.7.dylib");
    }
}
