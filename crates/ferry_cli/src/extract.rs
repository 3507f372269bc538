//! `ferry extract` re-stages binaries from the host without building.

use ferry_host::extract_artifacts;

use crate::pipeline::{load_project, overrides};
use crate::{ExtractArgs, GlobalArgs};

/// Runs the `ferry extract` command.
///
/// Every discovered module must already have a compiled binary.
pub fn run(args: &ExtractArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &overrides(&args.host, args.stage_in_source))?;
    let modules = project.discover()?;
    let staged = extract_artifacts(&modules)?;
    if !global.quiet {
        for path in &staged {
            eprintln!("      Staged {}", path.display());
        }
    }
    Ok(0)
}
