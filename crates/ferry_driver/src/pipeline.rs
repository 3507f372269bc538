//! The pipeline state machine.

use std::path::{Path, PathBuf};

use ferry_cache::FingerprintStore;
use ferry_codegen::CodeGenerator;
use ferry_host::{extract_artifacts, BuildInvoker, HostError, HostIntegrator};
use ferry_module::{discover_modules, DiscoveryOptions, HostProject, Module};
use tracing::info;

use crate::dirty::{assess, Assessment, DirtyReason};
use crate::error::{PipelineError, Stage};

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Number of modules discovered.
    pub discovered: usize,
    /// Modules that were rebuilt, with the reason.
    pub rebuilt: Vec<(String, DirtyReason)>,
    /// Import paths the binaries were staged to.
    pub staged: Vec<PathBuf>,
}

impl PipelineReport {
    /// Returns `true` if the dirty set was empty and the host build was skipped.
    pub fn build_skipped(&self) -> bool {
        self.rebuilt.is_empty()
    }
}

/// One configured pipeline. Each call to [`run`](Self::run) starts from
/// `Discover`.
#[derive(Debug)]
pub struct Pipeline {
    host: HostProject,
    discovery: DiscoveryOptions,
    generator: CodeGenerator,
    integrator: HostIntegrator,
    invoker: BuildInvoker,
    generate_project_files: bool,
    force: bool,
}

impl Pipeline {
    /// Assembles a pipeline from its components.
    pub fn new(
        host: HostProject,
        discovery: DiscoveryOptions,
        generator: CodeGenerator,
        integrator: HostIntegrator,
        invoker: BuildInvoker,
    ) -> Self {
        Self {
            host,
            discovery,
            generator,
            integrator,
            invoker,
            generate_project_files: false,
            force: false,
        }
    }

    /// Runs the host's project-file generator before building.
    pub fn with_project_files(mut self, enabled: bool) -> Self {
        self.generate_project_files = enabled;
        self
    }

    /// Treats every discovered module as dirty.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Runs every stage once.
    ///
    /// Fingerprints are recorded in `store` and saved only after the host
    /// build succeeded, so a stored fingerprint always belongs to a module
    /// that was actually rebuilt.
    pub fn run(&self, store: &mut FingerprintStore) -> Result<PipelineReport, PipelineError> {
        let modules = self.discover()?;
        let mut report = PipelineReport {
            discovered: modules.len(),
            ..PipelineReport::default()
        };

        let dirty = self.filter(&modules, store)?;
        if dirty.is_empty() {
            info!("no dirty modules, skipping build");
        } else {
            let dirty_modules: Vec<Module> = dirty.iter().map(|a| a.module.clone()).collect();

            enter(Stage::Generate);
            self.generator
                .generate(&dirty_modules)
                .map_err(|e| PipelineError::new(Stage::Generate, e))?;

            enter(Stage::Integrate);
            self.integrator
                .clean()
                .and_then(|()| self.integrator.inject(&dirty_modules))
                .map_err(|e| PipelineError::new(Stage::Integrate, e))?;

            if self.generate_project_files {
                enter(Stage::ProjectFiles);
                let script = self.host.project_files_script();
                self.stream(Stage::ProjectFiles, "project-files", &script, &[])?;
            }

            enter(Stage::InvokeBuild);
            let script = self.host.build_script();
            self.stream(Stage::InvokeBuild, "host-build", &script, &self.host.build_args())?;

            enter(Stage::PersistFingerprints);
            for a in &dirty {
                store.insert(&a.module.name, a.fingerprint);
            }
            store
                .save()
                .map_err(|e| PipelineError::new(Stage::PersistFingerprints, e))?;

            report.rebuilt = dirty
                .iter()
                .filter_map(|a| Some((a.module.name.clone(), a.reason?)))
                .collect();
        }

        enter(Stage::Extract);
        report.staged =
            extract_artifacts(&modules).map_err(|e| PipelineError::new(Stage::Extract, e))?;
        info!(
            discovered = report.discovered,
            rebuilt = report.rebuilt.len(),
            staged = report.staged.len(),
            "pipeline done"
        );
        Ok(report)
    }

    /// Runs only the `Discover` stage.
    pub fn discover(&self) -> Result<Vec<Module>, PipelineError> {
        enter(Stage::Discover);
        discover_modules(&self.discovery, &self.host)
            .map_err(|e| PipelineError::new(Stage::Discover, e))
    }

    /// `FilterDirty`, or `SkipFilter` when forced.
    fn filter(
        &self,
        modules: &[Module],
        store: &FingerprintStore,
    ) -> Result<Vec<Assessment>, PipelineError> {
        let stage = if self.force {
            Stage::SkipFilter
        } else {
            Stage::FilterDirty
        };
        enter(stage);
        let mut assessed = assess(modules, store).map_err(|e| PipelineError::new(stage, e))?;
        if self.force {
            for a in &mut assessed {
                a.reason = Some(DirtyReason::Forced);
            }
        }
        assessed.retain(Assessment::is_dirty);
        for a in &assessed {
            if let Some(reason) = a.reason {
                info!(module = %a.module.name, %reason, "dirty");
            }
        }
        Ok(assessed)
    }

    /// Runs a host tool to completion, logging each line as it arrives.
    fn stream(
        &self,
        stage: Stage,
        label: &str,
        program: &Path,
        args: &[String],
    ) -> Result<(), PipelineError> {
        let fail = |e: HostError| PipelineError::new(stage, e);
        let output = self.invoker.run(program, args, self.host.root()).map_err(fail)?;
        info!(command = %output.command(), "running {label}");
        for line in output {
            let line = line.map_err(fail)?;
            info!("{label} > {line}");
        }
        Ok(())
    }
}

fn enter(stage: Stage) {
    info!(%stage, "entering stage");
}
