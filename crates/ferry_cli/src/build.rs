//! `ferry build` runs the full pipeline.
//!
//! 1. Find the project root and resolve settings
//! 2. Validate the embedding runtime layout
//! 3. Assemble generator, integrator, and invoker
//! 4. Run the pipeline against the fingerprint cache
//! 5. Report what was rebuilt and staged

use ferry_codegen::{CodeGenerator, ExtensionCompiler};
use ferry_config::resolve_runtime;
use ferry_driver::{Pipeline, PipelineReport};
use ferry_host::{BuildInvoker, HostIntegrator};

use crate::pipeline::{env_var, load_project, overrides, Project};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `ferry build` command.
///
/// Returns exit code 0 when every stage succeeded. A failed stage is returned
/// as an error naming the stage.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &overrides(&args.host, args.stage_in_source))?;
    let settings = &project.resolved.settings;

    if !global.quiet {
        eprintln!(
            "    Building {} for {} {}",
            project.resolved.name, settings.platform, settings.variant
        );
    }

    let pipeline = assemble(&project, args.rebuild)?;
    let mut store = project.load_store();
    let report = pipeline.run(&mut store)?;

    if !global.quiet {
        print_report(&report);
    }
    Ok(0)
}

/// Wires the configured components into a [`Pipeline`].
fn assemble(project: &Project, force: bool) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let resolved = &project.resolved;
    let runtime = resolve_runtime(&project.config, resolved.settings.platform, &env_var)?;

    let compiler = ExtensionCompiler::new(
        resolved.compiler_program.clone(),
        resolved.compiler_args.clone(),
    );
    let generator = CodeGenerator::new(compiler, runtime.clone());
    let integrator = HostIntegrator::new(
        project.host.target_file(),
        resolved.dependencies.clone(),
        runtime,
    );
    let invoker = BuildInvoker::new(&resolved.failure_patterns)?;

    Ok(Pipeline::new(
        project.host.clone(),
        project.discovery_options(),
        generator,
        integrator,
        invoker,
    )
    .with_project_files(resolved.generate_project_files)
    .with_force(force))
}

fn print_report(report: &PipelineReport) {
    if report.build_skipped() {
        eprintln!("  Up to date {} module(s)", report.discovered);
    }
    for (name, reason) in &report.rebuilt {
        eprintln!("     Rebuilt {name} ({reason})");
    }
    for path in &report.staged {
        eprintln!("      Staged {}", path.display());
    }
    eprintln!(
        "    Finished {} rebuilt, {} staged",
        report.rebuilt.len(),
        report.staged.len()
    );
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::HostArgs;

    fn executable(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// A project whose compiler copies the source and whose host build writes
    /// one binary per registered module.
    fn setup(tmp: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let project = tmp.join("project");
        let host = tmp.join("host");
        let runtime = tmp.join("runtime");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::write(project.join("src/alpha.pyx"), "x = 1\n").unwrap();
        fs::create_dir_all(runtime.join("include_ferry/Python")).unwrap();
        fs::write(runtime.join("include_ferry/Python/Python.h"), "").unwrap();

        fs::create_dir_all(host.join("Engine/Source")).unwrap();
        fs::write(
            host.join("Engine/Source/UE4Editor.Target.cs"),
            "// @FERRY@\n// @/FERRY@\n",
        )
        .unwrap();
        executable(
            &host.join("Engine/Build/BatchFiles/Linux/Build.sh"),
            "cd Engine || exit 1\n\
             mkdir -p Binaries/Linux\n\
             grep -o 'Ferry_[A-Za-z0-9]*' Source/UE4Editor.Target.cs | while read n; do\n\
             echo built > Binaries/Linux/lib$1-$n.so\n\
             done\n",
        );
        let compiler = tmp.join("fake-cython");
        executable(&compiler, "cp \"$2\" \"$1\"\n");

        fs::write(
            project.join("ferry.toml"),
            format!(
                "[project]\nname = \"demo\"\n\n\
                 [host]\npath = \"{}\"\nplatform = \"Linux\"\nvariant = \"Development\"\n\
                 generate_project_files = false\n\n\
                 [codegen]\nprogram = \"{}\"\nargs = [\"{{output}}\", \"{{source}}\"]\n\n\
                 [runtime]\nbase = \"{}\"\n",
                host.display(),
                compiler.display(),
                runtime.display()
            ),
        )
        .unwrap();
        (project, host)
    }

    fn args() -> BuildArgs {
        BuildArgs {
            rebuild: false,
            stage_in_source: false,
            host: HostArgs {
                platform: Some("Linux".to_string()),
                ..HostArgs::default()
            },
        }
    }

    #[test]
    fn build_stages_binaries() {
        let tmp = TempDir::new().unwrap();
        let (project, _host) = setup(tmp.path());
        let global = GlobalArgs {
            quiet: true,
            config: Some(project.display().to_string()),
            ..GlobalArgs::default()
        };

        assert_eq!(run(&args(), &global).unwrap(), 0);
        assert_eq!(
            fs::read_to_string(project.join("build/lib/src/alpha.so")).unwrap(),
            "built\n"
        );
        assert!(project.join(".cache/module_fingerprints.json").is_file());
    }

    #[test]
    fn missing_runtime_header_fails_before_building() {
        let tmp = TempDir::new().unwrap();
        let (project, host) = setup(tmp.path());
        fs::remove_file(tmp.path().join("runtime/include_ferry/Python/Python.h")).unwrap();
        let global = GlobalArgs {
            quiet: true,
            config: Some(project.display().to_string()),
            ..GlobalArgs::default()
        };

        let err = run(&args(), &global).unwrap_err();
        assert!(err.to_string().contains("requires manual setup"));
        assert!(!host.join("Engine/Binaries").exists());
    }
}
