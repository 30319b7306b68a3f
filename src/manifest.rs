//! Package assembly
//!
//! Turns a backend [`Selection`] into everything the packaging tool consumes:
//! sub-packages, package data, extension descriptors and the optional
//! `build_ext` hook. With no backend selected there is no hook and no
//! extension, so nothing on that path needs `CMake`.

use crate::backend::Selection;
use crate::extensions::ExtensionDescriptor;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// The core package, always installed
pub const CORE_PACKAGE: &str = "pysnark";

/// Static distribution metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub author_email: &'static str,
    pub url: &'static str,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "PySNARK",
            version: "0.2",
            description: "Python zk-SNARK execution environment",
            author: "Meilof Veeningen",
            author_email: "meilof@gmail.com",
            url: "https://github.com/meilof/pysnark",
        }
    }
}

/// Build hook registered with the packaging tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildHook {
    /// Packaging command the hook replaces
    pub command: &'static str,
    /// Handler building every registered extension with `CMake`
    pub handler: &'static str,
}

impl BuildHook {
    /// The `CMake` extension builder bound to `build_ext`
    pub const CMAKE_BUILD: Self = Self {
        command: "build_ext",
        handler: "cmake",
    };
}

/// Everything handed to the packaging tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    pub metadata: PackageMetadata,
    /// Sub-packages to install
    pub packages: BTreeSet<String>,
    /// Data-file patterns per sub-package
    pub package_data: BTreeMap<String, Vec<String>>,
    /// Extensions for the build hook
    pub ext_modules: Vec<ExtensionDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_hook: Option<BuildHook>,
    /// Precompiled qaptools location, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qaptools_bin: Option<PathBuf>,
}

impl PackageManifest {
    /// Assemble the manifest for `selection`.
    ///
    /// Build-description directories are resolved under `project_root`.
    pub fn assemble(
        selection: Selection,
        project_root: &Path,
        qaptools_bin: Option<PathBuf>,
    ) -> Self {
        let mut packages = BTreeSet::from([CORE_PACKAGE.to_string()]);
        let mut package_data = BTreeMap::new();
        let mut ext_modules = Vec::new();

        for backend in selection.backends() {
            packages.insert(backend.sub_package().to_string());
            if let Some(patterns) = backend.package_data() {
                package_data.insert(
                    backend.sub_package().to_string(),
                    patterns.iter().map(|p| (*p).to_string()).collect(),
                );
            }
            ext_modules.push(ExtensionDescriptor::for_backend(backend, project_root));
        }

        let build_hook = (!selection.is_empty()).then_some(BuildHook::CMAKE_BUILD);

        Self {
            metadata: PackageMetadata::default(),
            packages,
            package_data,
            ext_modules,
            build_hook,
            qaptools_bin,
        }
    }

    /// Whether the native build step runs at all
    pub const fn needs_native_build(&self) -> bool {
        self.build_hook.is_some()
    }
}
