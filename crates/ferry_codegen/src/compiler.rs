//! Invocation of the external extension compiler.

use std::process::{Command, Stdio};

use ferry_module::Module;
use tracing::debug;

use crate::error::CodegenError;

/// Placeholder replaced with the module source path.
pub const SOURCE_PLACEHOLDER: &str = "{source}";
/// Placeholder replaced with the intermediate output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// The extension compiler executable and its argument template.
#[derive(Debug, Clone)]
pub struct ExtensionCompiler {
    program: String,
    args: Vec<String>,
}

impl ExtensionCompiler {
    /// Creates a compiler invocation. `{source}` and `{output}` in `args`
    /// are substituted per module.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments for one module with placeholders substituted.
    pub fn args_for(&self, module: &Module) -> Vec<String> {
        let source = module.source.to_string_lossy();
        let output = module.generated_source.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(SOURCE_PLACEHOLDER, &source)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }

    /// Compiles one module to its intermediate source.
    ///
    /// The output directory is created first. Success is exit code 0; the
    /// compiler is trusted to have written the output file.
    pub fn compile(&self, module: &Module) -> Result<(), CodegenError> {
        if let Some(dir) = module.generated_source.parent() {
            std::fs::create_dir_all(dir).map_err(|e| CodegenError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let args = self.args_for(module);
        let command = std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(module = %module.name, %command, "running extension compiler");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CodegenError::SpawnFailed {
                module: module.name.clone(),
                program: self.program.clone(),
                source: e,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(module = %module.name, "compiler > {line}");
        }

        if !output.status.success() {
            return Err(CodegenError::CompilerFailed {
                module: module.name.clone(),
                command,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_common::{BuildSettings, BuildVariant, Platform, Staging};
    use ferry_module::HostProject;
    use std::path::Path;

    fn module(project: &Path, host_root: &Path) -> Module {
        let host = HostProject::new(&BuildSettings {
            platform: Platform::Linux,
            variant: BuildVariant::Development,
            host_root: host_root.to_path_buf(),
            host_target: "UE4Editor".to_string(),
            project_root: project.to_path_buf(),
            staging: Staging::OutOfTree,
        })
        .unwrap();
        let source = project.join("alpha.pyx");
        std::fs::write(&source, "x = 1\n").unwrap();
        Module::new(&source, "Ferry", "pxd", &host).unwrap()
    }

    #[test]
    fn substitutes_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let m = module(dir.path(), Path::new("/ue"));
        let compiler = ExtensionCompiler::new(
            "cython",
            vec!["--cplus".into(), "-o".into(), "{output}".into(), "{source}".into()],
        );
        let args = compiler.args_for(&m);
        assert_eq!(args[0], "--cplus");
        assert_eq!(args[2], m.generated_source.to_string_lossy());
        assert_eq!(args[3], m.source.to_string_lossy());
    }

    #[cfg(unix)]
    #[test]
    fn successful_compile_creates_output_dir() {
        let project = tempfile::tempdir().unwrap();
        let host = tempfile::tempdir().unwrap();
        let m = module(project.path(), host.path());
        let compiler = ExtensionCompiler::new(
            "sh",
            vec!["-c".into(), "cp \"$0\" \"$1\"".into(), "{source}".into(), "{output}".into()],
        );
        compiler.compile(&m).unwrap();
        assert_eq!(
            std::fs::read_to_string(&m.generated_source).unwrap(),
            "x = 1\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_names_module() {
        let project = tempfile::tempdir().unwrap();
        let host = tempfile::tempdir().unwrap();
        let m = module(project.path(), host.path());
        let compiler = ExtensionCompiler::new(
            "sh",
            vec!["-c".into(), "echo broken >&2; exit 3".into()],
        );
        match compiler.compile(&m).unwrap_err() {
            CodegenError::CompilerFailed {
                module,
                code,
                stderr,
                ..
            } => {
                assert_eq!(module, "alpha");
                assert_eq!(code, 3);
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let project = tempfile::tempdir().unwrap();
        let host = tempfile::tempdir().unwrap();
        let m = module(project.path(), host.path());
        let compiler = ExtensionCompiler::new("ferry-no-such-compiler", vec![]);
        assert!(matches!(
            compiler.compile(&m).unwrap_err(),
            CodegenError::SpawnFailed { .. }
        ));
    }
}
