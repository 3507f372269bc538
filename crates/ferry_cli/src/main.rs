//! Ferry CLI: builds extension-language modules into a host engine.
//!
//! `ferry init` scaffolds a project, `ferry build` runs the incremental
//! pipeline, `ferry clean` empties the host registration region, `ferry status`
//! reports which modules are dirty, and `ferry extract` re-stages binaries that
//! were already built.

#![warn(missing_docs)]

mod build;
mod clean;
mod extract;
mod init;
mod pipeline;
mod status;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Ferry, an incremental build orchestrator for host-engine extension modules.
#[derive(Parser, Debug)]
#[command(name = "ferry", version, about = "Ferry extension module builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `ferry.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new ferry project.
    Init {
        /// Project name (creates a subdirectory). If omitted, initializes in
        /// the current directory.
        name: Option<String>,

        /// Host engine checkout to record in `ferry.toml`.
        #[arg(long)]
        host_path: Option<String>,
    },
    /// Generate, register, and build dirty modules, then stage all binaries.
    Build(BuildArgs),
    /// Remove every registration line ferry added to the host target file.
    Clean(HostArgs),
    /// List discovered modules and whether each needs a rebuild.
    Status(HostArgs),
    /// Stage already-built binaries without building.
    Extract(ExtractArgs),
}

/// Host selection flags shared by every command that touches the host.
#[derive(Parser, Debug, Default)]
pub struct HostArgs {
    /// Host engine checkout (overrides `FERRY_HOST_PATH` and `ferry.toml`).
    #[arg(long)]
    pub host_path: Option<String>,

    /// Host build variant, `Development` or `Debug`.
    #[arg(long)]
    pub variant: Option<String>,

    /// Host platform, `Win64`, `Mac`, or `Linux`. Defaults to the running OS.
    #[arg(long)]
    pub platform: Option<String>,
}

/// Arguments for the `ferry build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Rebuild every module regardless of the fingerprint cache.
    #[arg(long)]
    pub rebuild: bool,

    /// Stage binaries beside their sources instead of under `build/lib`.
    #[arg(long)]
    pub stage_in_source: bool,

    /// Host selection.
    #[command(flatten)]
    pub host: HostArgs,
}

/// Arguments for the `ferry extract` subcommand.
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Stage binaries beside their sources instead of under `build/lib`.
    #[arg(long)]
    pub stage_in_source: bool,

    /// Host selection.
    #[command(flatten)]
    pub host: HostArgs,
}

/// Color output choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Resolved global arguments passed to every command.
#[derive(Debug, Default)]
pub struct GlobalArgs {
    /// Suppress status output.
    pub quiet: bool,
    /// Enable debug-level logging.
    pub verbose: bool,
    /// Whether log output is colored.
    pub color: bool,
    /// Explicit path to `ferry.toml` or its directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Init { name, host_path } => init::run(name, host_path, &global),
        Command::Build(ref args) => build::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Extract(ref args) => extract::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over the
/// level implied by `--quiet` and `--verbose`.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(global)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "info"
    }
}
