//! Code generation for dirty modules.
//!
//! The external extension compiler turns each module source into an
//! intermediate native source inside the host-module directory. The emitted
//! file is then post-processed so the host toolchain can build it: the
//! module's precompiled header is included first, and includes of runtime
//! headers that clash with host headers are redirected to their
//! disambiguated location.

#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod postprocess;

pub use compiler::ExtensionCompiler;
pub use error::CodegenError;
pub use postprocess::{postprocess_file, rewrite_source};

use ferry_common::RuntimePaths;
use ferry_module::Module;
use tracing::info;

/// Compiles and post-processes modules.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    compiler: ExtensionCompiler,
    runtime: RuntimePaths,
}

impl CodeGenerator {
    /// Creates a generator that runs `compiler` and rewrites includes against
    /// `runtime`.
    pub fn new(compiler: ExtensionCompiler, runtime: RuntimePaths) -> Self {
        Self { compiler, runtime }
    }

    /// Generates the intermediate source for each module, stopping at the
    /// first failure.
    pub fn generate(&self, modules: &[Module]) -> Result<(), CodegenError> {
        for module in modules {
            info!(module = %module.name, output = %module.generated_source.display(), "generating");
            self.compiler.compile(module)?;
            postprocess_file(&module.generated_source, &module.pch, &self.runtime)?;
        }
        Ok(())
    }
}
