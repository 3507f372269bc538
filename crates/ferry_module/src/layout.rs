//! Host project layout and the per-(platform, variant) naming table.
//!
//! Every platform-conditional decision (binary names, bundle directories,
//! library and import extensions, build scripts) is read from [`LAYOUTS`],
//! so descriptor writing, the build invoker, and artifact extraction all
//! agree on one source of truth.

use std::path::{Path, PathBuf};

use ferry_common::{BuildSettings, BuildVariant, Platform, Staging, UnsupportedPlatform};

/// One row of the layout table. `{target}` in string fields is replaced with
/// the host editor target name.
struct LayoutRow {
    platform: Platform,
    variant: BuildVariant,
    binary_subdir: Option<&'static str>,
    binary_prefix: &'static str,
    binary_suffix: &'static str,
    binary_ext: &'static str,
    import_ext: &'static str,
    build_script: &'static [&'static str],
    project_files_script: &'static str,
}

const WIN_BUILD: &[&str] = &["Engine", "Build", "BatchFiles", "Build.bat"];
const MAC_BUILD: &[&str] = &["Engine", "Build", "BatchFiles", "Mac", "Build.sh"];
const LINUX_BUILD: &[&str] = &["Engine", "Build", "BatchFiles", "Linux", "Build.sh"];

const LAYOUTS: [LayoutRow; 6] = [
    LayoutRow {
        platform: Platform::Win64,
        variant: BuildVariant::Development,
        binary_subdir: None,
        binary_prefix: "",
        binary_suffix: "",
        binary_ext: ".dll",
        import_ext: ".pyd",
        build_script: WIN_BUILD,
        project_files_script: "GenerateProjectFiles.bat",
    },
    LayoutRow {
        platform: Platform::Win64,
        variant: BuildVariant::Debug,
        binary_subdir: None,
        binary_prefix: "",
        binary_suffix: "-Win64-Debug",
        binary_ext: ".dll",
        import_ext: ".pyd",
        build_script: WIN_BUILD,
        project_files_script: "GenerateProjectFiles.bat",
    },
    LayoutRow {
        platform: Platform::Mac,
        variant: BuildVariant::Development,
        binary_subdir: Some("{target}.app/Contents/MacOS"),
        binary_prefix: "",
        binary_suffix: "",
        binary_ext: ".dylib",
        import_ext: ".so",
        build_script: MAC_BUILD,
        project_files_script: "GenerateProjectFiles.sh",
    },
    LayoutRow {
        platform: Platform::Mac,
        variant: BuildVariant::Debug,
        binary_subdir: Some("{target}-Mac-Debug.app/Contents/MacOS"),
        binary_prefix: "",
        binary_suffix: "-Mac-Debug",
        binary_ext: ".dylib",
        import_ext: ".so",
        build_script: MAC_BUILD,
        project_files_script: "GenerateProjectFiles.sh",
    },
    LayoutRow {
        platform: Platform::Linux,
        variant: BuildVariant::Development,
        binary_subdir: None,
        binary_prefix: "lib",
        binary_suffix: "",
        binary_ext: ".so",
        import_ext: ".so",
        build_script: LINUX_BUILD,
        project_files_script: "GenerateProjectFiles.sh",
    },
    LayoutRow {
        platform: Platform::Linux,
        variant: BuildVariant::Debug,
        binary_subdir: None,
        binary_prefix: "lib",
        binary_suffix: "-Linux-Debug",
        binary_ext: ".so",
        import_ext: ".so",
        build_script: LINUX_BUILD,
        project_files_script: "GenerateProjectFiles.sh",
    },
];

/// Resolved naming rules for one (platform, variant, target) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    /// Platform this layout describes.
    pub platform: Platform,
    /// Build variant this layout describes.
    pub variant: BuildVariant,
    /// Host editor target name.
    pub target: String,
    /// Directory below `Engine/Binaries/<platform>` holding the binaries.
    pub binary_subdir: Option<PathBuf>,
    binary_prefix: &'static str,
    binary_suffix: &'static str,
    binary_ext: &'static str,
    /// Extension of a loadable extension module on this platform.
    pub import_ext: &'static str,
    build_script: &'static [&'static str],
    project_files_script: &'static str,
}

impl TargetLayout {
    /// Looks up the layout for a platform and variant.
    pub fn lookup(
        platform: Platform,
        variant: BuildVariant,
        target: &str,
    ) -> Result<Self, UnsupportedPlatform> {
        let row = LAYOUTS
            .iter()
            .find(|row| row.platform == platform && row.variant == variant)
            .ok_or_else(|| UnsupportedPlatform(format!("{platform} ({variant})")))?;
        Ok(Self {
            platform,
            variant,
            target: target.to_string(),
            binary_subdir: row
                .binary_subdir
                .map(|s| s.replace("{target}", target))
                .map(|s| s.split('/').collect::<PathBuf>()),
            binary_prefix: row.binary_prefix,
            binary_suffix: row.binary_suffix,
            binary_ext: row.binary_ext,
            import_ext: row.import_ext,
            build_script: row.build_script,
            project_files_script: row.project_files_script,
        })
    }

    /// File name of the compiled binary the host produces for a module.
    ///
    /// Development builds use `<Target>-<Module><ext>`; debug builds append
    /// the platform and variant: `<Target>-<Module>-<Platform>-Debug<ext>`.
    pub fn binary_name(&self, host_name: &str) -> String {
        format!(
            "{}{}-{}{}{}",
            self.binary_prefix, self.target, host_name, self.binary_suffix, self.binary_ext
        )
    }
}

/// Path map of a host engine checkout for one build configuration.
#[derive(Debug, Clone)]
pub struct HostProject {
    settings: BuildSettings,
    layout: TargetLayout,
}

impl HostProject {
    /// Binds the layout table to a build configuration.
    ///
    /// Fails immediately if the configured platform has no layout.
    pub fn new(settings: &BuildSettings) -> Result<Self, UnsupportedPlatform> {
        let layout = TargetLayout::lookup(settings.platform, settings.variant, &settings.host_target)?;
        Ok(Self {
            settings: settings.clone(),
            layout,
        })
    }

    /// Host engine root.
    pub fn root(&self) -> &Path {
        &self.settings.host_root
    }

    /// Directory holding the generated host module `host_name`.
    pub fn module_dir(&self, host_name: &str) -> PathBuf {
        self.settings
            .engine_dir()
            .join("Source")
            .join("Editor")
            .join(host_name)
    }

    /// The editor target file that carries the module registration region.
    pub fn target_file(&self) -> PathBuf {
        self.settings
            .engine_dir()
            .join("Source")
            .join(format!("{}.Target.cs", self.settings.host_target))
    }

    /// Expected location of the compiled binary for `host_name`.
    pub fn binary_path(&self, host_name: &str) -> PathBuf {
        let mut path = self
            .settings
            .engine_dir()
            .join("Binaries")
            .join(self.layout.platform.as_str());
        if let Some(subdir) = &self.layout.binary_subdir {
            path.push(subdir);
        }
        path.push(self.layout.binary_name(host_name));
        path
    }

    /// The host build script.
    pub fn build_script(&self) -> PathBuf {
        self.layout
            .build_script
            .iter()
            .fold(self.settings.host_root.clone(), |p, c| p.join(c))
    }

    /// Arguments passed to the build script: target, platform, variant.
    pub fn build_args(&self) -> Vec<String> {
        vec![
            self.settings.host_target.clone(),
            self.layout.platform.to_string(),
            self.layout.variant.to_string(),
        ]
    }

    /// The script that regenerates host project files.
    pub fn project_files_script(&self) -> PathBuf {
        self.settings.host_root.join(self.layout.project_files_script)
    }

    /// Extension of loadable extension modules on the target platform.
    pub fn import_ext(&self) -> &'static str {
        self.layout.import_ext
    }

    /// Destination staging mode.
    pub fn staging(&self) -> Staging {
        self.settings.staging
    }

    /// Root of the project whose modules are built.
    pub fn project_root(&self) -> &Path {
        &self.settings.project_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(platform: Platform, variant: BuildVariant) -> BuildSettings {
        BuildSettings {
            platform,
            variant,
            host_root: PathBuf::from("/ue"),
            host_target: "UE4Editor".to_string(),
            project_root: PathBuf::from("/proj"),
            staging: Staging::OutOfTree,
        }
    }

    fn host(platform: Platform, variant: BuildVariant) -> HostProject {
        HostProject::new(&settings(platform, variant)).unwrap()
    }

    #[test]
    fn every_combination_has_a_row() {
        for platform in Platform::ALL {
            for variant in [BuildVariant::Development, BuildVariant::Debug] {
                assert!(TargetLayout::lookup(platform, variant, "UE4Editor").is_ok());
            }
        }
    }

    #[test]
    fn win64_development_binary() {
        let h = host(Platform::Win64, BuildVariant::Development);
        assert_eq!(
            h.binary_path("Ferry_Core"),
            PathBuf::from("/ue/Engine/Binaries/Win64/UE4Editor-Ferry_Core.dll")
        );
        assert_eq!(h.import_ext(), ".pyd");
    }

    #[test]
    fn win64_debug_binary() {
        let h = host(Platform::Win64, BuildVariant::Debug);
        assert_eq!(
            h.binary_path("Ferry_Core"),
            PathBuf::from("/ue/Engine/Binaries/Win64/UE4Editor-Ferry_Core-Win64-Debug.dll")
        );
    }

    #[test]
    fn mac_development_binary_inside_bundle() {
        let h = host(Platform::Mac, BuildVariant::Development);
        assert_eq!(
            h.binary_path("Ferry_Core"),
            PathBuf::from(
                "/ue/Engine/Binaries/Mac/UE4Editor.app/Contents/MacOS/UE4Editor-Ferry_Core.dylib"
            )
        );
        assert_eq!(h.import_ext(), ".so");
    }

    #[test]
    fn mac_debug_binary_inside_debug_bundle() {
        let h = host(Platform::Mac, BuildVariant::Debug);
        assert_eq!(
            h.binary_path("Ferry_Core"),
            PathBuf::from(
                "/ue/Engine/Binaries/Mac/UE4Editor-Mac-Debug.app/Contents/MacOS/\
                 UE4Editor-Ferry_Core-Mac-Debug.dylib"
            )
        );
    }

    #[test]
    fn linux_binaries() {
        let dev = host(Platform::Linux, BuildVariant::Development);
        assert_eq!(
            dev.binary_path("Ferry_Core"),
            PathBuf::from("/ue/Engine/Binaries/Linux/libUE4Editor-Ferry_Core.so")
        );
        let debug = host(Platform::Linux, BuildVariant::Debug);
        assert_eq!(
            debug.binary_path("Ferry_Core"),
            PathBuf::from("/ue/Engine/Binaries/Linux/libUE4Editor-Ferry_Core-Linux-Debug.so")
        );
    }

    #[test]
    fn source_paths() {
        let h = host(Platform::Mac, BuildVariant::Development);
        assert_eq!(
            h.module_dir("Ferry_Core"),
            PathBuf::from("/ue/Engine/Source/Editor/Ferry_Core")
        );
        assert_eq!(
            h.target_file(),
            PathBuf::from("/ue/Engine/Source/UE4Editor.Target.cs")
        );
    }

    #[test]
    fn build_scripts_per_platform() {
        assert_eq!(
            host(Platform::Win64, BuildVariant::Debug).build_script(),
            PathBuf::from("/ue/Engine/Build/BatchFiles/Build.bat")
        );
        assert_eq!(
            host(Platform::Mac, BuildVariant::Debug).build_script(),
            PathBuf::from("/ue/Engine/Build/BatchFiles/Mac/Build.sh")
        );
        assert_eq!(
            host(Platform::Linux, BuildVariant::Debug).project_files_script(),
            PathBuf::from("/ue/GenerateProjectFiles.sh")
        );
        assert_eq!(
            host(Platform::Win64, BuildVariant::Debug).project_files_script(),
            PathBuf::from("/ue/GenerateProjectFiles.bat")
        );
    }

    #[test]
    fn build_args_order() {
        let h = host(Platform::Mac, BuildVariant::Debug);
        assert_eq!(h.build_args(), vec!["UE4Editor", "Mac", "Debug"]);
    }
}
