//! `ferry status` reports which modules the next build would rebuild.

use ferry_driver::{assess, Assessment};

use crate::pipeline::{load_project, overrides};
use crate::{GlobalArgs, HostArgs};

/// Runs the `ferry status` command.
///
/// Prints one line per discovered module to stdout. Nothing is written.
pub fn run(args: &HostArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global, &overrides(args, false))?;
    let modules = project.discover()?;
    let store = project.load_store();
    let assessed = assess(&modules, &store)?;

    for line in status_lines(&assessed) {
        println!("{line}");
    }
    if !global.quiet {
        let dirty = assessed.iter().filter(|a| a.is_dirty()).count();
        eprintln!("{} module(s), {dirty} dirty", assessed.len());
    }
    Ok(0)
}

fn status_lines(assessed: &[Assessment]) -> Vec<String> {
    assessed
        .iter()
        .map(|a| match a.reason {
            Some(reason) => format!("dirty  {} ({reason})", a.module.name),
            None => format!("clean  {}", a.module.name),
        })
        .collect()
}
