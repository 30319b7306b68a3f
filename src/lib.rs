//! Build orchestration for the optional native PySNARK backends
//!
//! The flow of one invocation:
//! 1. [`args::classify`] splits tool flags from the packaging arguments
//! 2. [`backend::Selection`] decides which backends are built
//! 3. [`manifest::PackageManifest`] lists packages, data and extensions
//! 4. [`extensions::ExtensionBuilder`] configures and builds each extension
//!    with `CMake` when the `build-ext` hook runs

pub mod args;
pub mod backend;
pub mod config;
pub mod debug;
pub mod env_vars;
pub mod extensions;
pub mod manifest;
pub mod tools;

#[cfg(test)]
mod test_utils;

// Re-export common types for convenience
pub use args::{ArgsError, ClassifiedArgs, classify, usage};
pub use backend::{Backend, BackendFlags, Selection};
pub use config::Config;
pub use debug::{debug_log, init_debug, is_debug_enabled};
pub use extensions::{
    BuildDirs, BuildError, BuildGenerator, BuildOutputLayout, BuildResult, CMake,
    ExtensionBuilder, ExtensionDescriptor,
};
pub use manifest::{BuildHook, PackageManifest};
