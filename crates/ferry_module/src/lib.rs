//! Extension source modules and the host project layout they map onto.
//!
//! A [`Module`] is discovered from one source file and derives every
//! identifier and path the rest of the pipeline needs: the host-module name,
//! the generated intermediate source, the precompiled header, the build
//! descriptor, the compiled binary inside the host's output tree, and the
//! import location it is staged to. Platform-specific naming is collected in
//! a single (platform, variant) lookup table, [`TargetLayout`].

#![warn(missing_docs)]

pub mod discovery;
pub mod error;
pub mod layout;
pub mod module;

pub use discovery::{discover_modules, DiscoveryOptions};
pub use error::ModuleError;
pub use layout::{HostProject, TargetLayout};
pub use module::Module;
