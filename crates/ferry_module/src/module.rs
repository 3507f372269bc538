//! The module descriptor: one source file and every identifier and path
//! derived from it.

use std::path::{Path, PathBuf};

use ferry_common::{host_module_name, Staging};

use crate::error::ModuleError;
use crate::layout::HostProject;

/// Directory under the project root that mirrors the source tree for
/// out-of-tree staging.
const STAGING_DIR: [&str; 2] = ["build", "lib"];

/// One discovered extension source module.
///
/// Constructed fresh on every discovery pass and never persisted; only its
/// fingerprint is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Identity: the source file's base name without extension.
    pub name: String,
    /// Absolute source path.
    pub source: PathBuf,
    /// Companion declaration file with the same base name, if present.
    pub declaration: Option<PathBuf>,
    /// Namespaced host-module name, e.g. `Ferry_FooBar` for `foo_bar`.
    pub host_name: String,
    /// Host-module directory inside the host source tree.
    pub module_dir: PathBuf,
    /// Intermediate source emitted by the extension compiler.
    pub generated_source: PathBuf,
    /// Precompiled header as referenced from the generated source.
    pub pch: String,
    /// Precompiled header on disk.
    pub pch_path: PathBuf,
    /// Generated build descriptor.
    pub descriptor_path: PathBuf,
    /// Expected compiled binary inside the host output tree.
    pub binary: PathBuf,
    /// Destination the binary is staged to for import.
    pub import_path: PathBuf,
}

impl Module {
    /// Derives a module from its source file.
    ///
    /// `declaration_extension` names the companion file looked up beside the
    /// source (`pxd` for `foo.pyx` gives `foo.pxd`).
    pub fn new(
        source: &Path,
        prefix: &str,
        declaration_extension: &str,
        host: &HostProject,
    ) -> Result<Self, ModuleError> {
        if !source.is_file() {
            return Err(ModuleError::MissingSource {
                path: source.to_path_buf(),
            });
        }
        let name = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let host_name = host_module_name(prefix, &name)?;

        let declaration = Some(source.with_extension(declaration_extension))
            .filter(|p| !declaration_extension.is_empty() && p.is_file());

        let module_dir = host.module_dir(&host_name);
        let private_dir = module_dir.join("Private");
        let pch_file = format!("{host_name}PrivatePCH.h");

        let import_path = import_path(source, &name, host)?;

        Ok(Self {
            source: source.to_path_buf(),
            declaration,
            generated_source: private_dir.join(format!("{host_name}.cpp")),
            pch: format!("Private/{pch_file}"),
            pch_path: private_dir.join(pch_file),
            descriptor_path: module_dir.join(format!("{host_name}.Build.cs")),
            binary: host.binary_path(&host_name),
            module_dir,
            import_path,
            host_name,
            name,
        })
    }
}

/// Computes where the compiled binary is staged for import.
fn import_path(source: &Path, name: &str, host: &HostProject) -> Result<PathBuf, ModuleError> {
    let file_name = format!("{name}{}", host.import_ext());
    match host.staging() {
        Staging::InSource => Ok(source.with_file_name(file_name)),
        Staging::OutOfTree => {
            let root = host.project_root();
            let relative = source
                .parent()
                .and_then(|dir| dir.strip_prefix(root).ok())
                .ok_or_else(|| ModuleError::OutsideProject {
                    path: source.to_path_buf(),
                    root: root.to_path_buf(),
                })?;
            let mut dest = STAGING_DIR.iter().fold(root.to_path_buf(), |p, c| p.join(c));
            dest.push(relative);
            dest.push(file_name);
            Ok(dest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_common::{BuildSettings, BuildVariant, Platform};

    fn host(project_root: &Path, platform: Platform, staging: Staging) -> HostProject {
        HostProject::new(&BuildSettings {
            platform,
            variant: BuildVariant::Development,
            host_root: PathBuf::from("/ue"),
            host_target: "UE4Editor".to_string(),
            project_root: project_root.to_path_buf(),
            staging,
        })
        .unwrap()
    }

    #[test]
    fn derives_all_paths() {
        let dir = tempfile::tempdir().unwrap();
        let src_dir = dir.path().join("src").join("pkg");
        std::fs::create_dir_all(&src_dir).unwrap();
        let source = src_dir.join("foo_bar.pyx");
        std::fs::write(&source, "").unwrap();

        let h = host(dir.path(), Platform::Win64, Staging::OutOfTree);
        let m = Module::new(&source, "Ferry", "pxd", &h).unwrap();

        assert_eq!(m.name, "foo_bar");
        assert_eq!(m.host_name, "Ferry_FooBar");
        assert_eq!(m.declaration, None);
        assert_eq!(m.module_dir, PathBuf::from("/ue/Engine/Source/Editor/Ferry_FooBar"));
        assert_eq!(
            m.generated_source,
            PathBuf::from("/ue/Engine/Source/Editor/Ferry_FooBar/Private/Ferry_FooBar.cpp")
        );
        assert_eq!(m.pch, "Private/Ferry_FooBarPrivatePCH.h");
        assert_eq!(
            m.pch_path,
            PathBuf::from("/ue/Engine/Source/Editor/Ferry_FooBar/Private/Ferry_FooBarPrivatePCH.h")
        );
        assert_eq!(
            m.descriptor_path,
            PathBuf::from("/ue/Engine/Source/Editor/Ferry_FooBar/Ferry_FooBar.Build.cs")
        );
        assert_eq!(
            m.binary,
            PathBuf::from("/ue/Engine/Binaries/Win64/UE4Editor-Ferry_FooBar.dll")
        );
        assert_eq!(
            m.import_path,
            dir.path().join("build").join("lib").join("src").join("pkg").join("foo_bar.pyd")
        );
    }

    #[test]
    fn finds_declaration_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alpha.pyx");
        std::fs::write(&source, "").unwrap();
        std::fs::write(dir.path().join("alpha.pxd"), "").unwrap();

        let h = host(dir.path(), Platform::Mac, Staging::OutOfTree);
        let m = Module::new(&source, "Ferry", "pxd", &h).unwrap();
        assert_eq!(m.declaration, Some(dir.path().join("alpha.pxd")));
    }

    #[test]
    fn in_source_staging_sits_beside_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("alpha.pyx");
        std::fs::write(&source, "").unwrap();

        let h = host(dir.path(), Platform::Mac, Staging::InSource);
        let m = Module::new(&source, "Ferry", "pxd", &h).unwrap();
        assert_eq!(m.import_path, dir.path().join("alpha.so"));
    }

    #[test]
    fn out_of_tree_outside_project_errors() {
        let project = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let source = elsewhere.path().join("alpha.pyx");
        std::fs::write(&source, "").unwrap();

        let h = host(project.path(), Platform::Linux, Staging::OutOfTree);
        let err = Module::new(&source, "Ferry", "pxd", &h).unwrap_err();
        assert!(matches!(err, ModuleError::OutsideProject { .. }));
    }

    #[test]
    fn missing_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let h = host(dir.path(), Platform::Linux, Staging::OutOfTree);
        let err = Module::new(&dir.path().join("nope.pyx"), "Ferry", "pxd", &h).unwrap_err();
        assert!(matches!(err, ModuleError::MissingSource { .. }));
    }

    #[test]
    fn invalid_identity_errors() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("my-module.pyx");
        std::fs::write(&source, "").unwrap();
        let h = host(dir.path(), Platform::Linux, Staging::OutOfTree);
        let err = Module::new(&source, "Ferry", "pxd", &h).unwrap_err();
        assert!(matches!(err, ModuleError::InvalidName(_)));
    }
}
