//! Native extension building
//!
//! Each optional backend is a `CMake` project compiled into a Python
//! extension module. This module describes those extensions and drives the
//! build generator over them.
//!
//! - [`types`]: descriptors, output layout, errors
//! - [`cmake_extension`]: the generator interface and its `CMake` implementation
//! - [`builder`]: the driver run by the `build-ext` hook

pub mod builder;
pub mod cmake_extension;
pub mod types;

pub use builder::{BuildDirs, ExtensionBuilder};
pub use cmake_extension::{BuildGenerator, CMake, parse_version};
pub use types::{BuildError, BuildOutputLayout, BuildResult, ExtensionDescriptor, StepError};
