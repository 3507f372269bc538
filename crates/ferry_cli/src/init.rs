//! `ferry init` scaffolds a project.
//!
//! Creates `src/` and a `ferry.toml` that spells out every section with its
//! defaults so the file doubles as documentation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ferry_config::CONFIG_FILE;

use crate::GlobalArgs;

/// Runs the `ferry init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory, refusing to
/// overwrite an existing `ferry.toml`.
pub fn run(
    name: Option<String>,
    host_path: Option<String>,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };
    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project");

    if !global.quiet {
        eprintln!("  Creating new ferry project `{project_name}`");
    }

    fs::create_dir_all(project_dir.join("src"))?;
    write_ferry_toml(&project_dir, project_name, host_path.as_deref())?;

    if !global.quiet {
        eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
        eprintln!("     Created {}", project_dir.join("src").display());
    }
    Ok(0)
}

/// Writes the `ferry.toml` configuration file.
fn write_ferry_toml(root: &Path, name: &str, host_path: Option<&str>) -> io::Result<()> {
    let host_line = match host_path {
        Some(path) => format!("path = {}", toml_string(path)),
        None => "# path = \"/path/to/UnrealEngine\"  # or set FERRY_HOST_PATH".to_string(),
    };
    let content = format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[modules]
roots = ["src"]
extension = "pyx"
declaration_extension = "pxd"
prefix = "Ferry"

[host]
{host_line}
target = "UE4Editor"
# variant = "Development"  # or set FERRY_HOST_CONFIG
dependencies = ["Core", "CoreUObject", "Engine", "UnrealEd"]
generate_project_files = true
failure_patterns = ["^ERROR:"]

[codegen]
program = "cython"
args = ["--verbose", "--cplus", "-o", "{{output}}", "{{source}}"]

[runtime]
# base = "/path/to/python"  # or set FERRY_RUNTIME_BASE
include_dir = "include_ferry"
header_subdir = "Python"
"#
    );
    fs::write(root.join(CONFIG_FILE), content)
}

/// Quotes `s` as a TOML basic string.
fn toml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
