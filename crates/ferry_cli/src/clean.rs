//! `ferry clean` empties the registration region of the host target file.

use ferry_host::clean_registration;

use crate::pipeline::{load_project, overrides};
use crate::{GlobalArgs, HostArgs};

/// Runs the `ferry clean` command.
///
/// Generated descriptors and binaries are left in place; only the host's
/// module list is reset.
pub fn run(args: &HostArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &overrides(args, false))?;
    let target = project.host.target_file();
    clean_registration(&target)?;
    if !global.quiet {
        eprintln!("     Cleaned {}", target.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn clean_removes_registered_modules() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let host = tmp.path().join("host");
        fs::create_dir_all(&project).unwrap();
        fs::create_dir_all(host.join("Engine/Source")).unwrap();
        let target = host.join("Engine/Source/UE4Editor.Target.cs");
        fs::write(
            &target,
            "a\n// @FERRY@\nOutExtraModuleNames.Add(\"Ferry_Alpha\");\n// @/FERRY@\nb\n",
        )
        .unwrap();
        fs::write(
            project.join("ferry.toml"),
            format!(
                "[project]\nname = \"demo\"\n\n[host]\npath = \"{}\"\nplatform = \"Linux\"\n",
                host.display()
            ),
        )
        .unwrap();

        let global = GlobalArgs {
            quiet: true,
            config: Some(project.display().to_string()),
            ..GlobalArgs::default()
        };
        let args = HostArgs {
            platform: Some("Linux".to_string()),
            ..HostArgs::default()
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "a\n// @FERRY@\n// @/FERRY@\nb\n"
        );
    }
}
