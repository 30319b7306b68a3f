//! Extension descriptors, output layout, and build errors
//!
//! A descriptor only names an extension and points at its `CMake` project.
//! It carries no source list: compilation units belong to the
//! `CMakeLists.txt`.

use crate::args::FORWARD_PREFIX;
use crate::backend::Backend;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Binding between a logical module name and its native build description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    /// Dotted module name, e.g. `pysnark.libsnark.all`
    pub name: String,
    /// Absolute directory containing the `CMakeLists.txt`
    pub build_description_dir: PathBuf,
}

impl ExtensionDescriptor {
    /// Create a descriptor, making `build_description_dir` absolute.
    ///
    /// The directory is not required to exist; a missing one surfaces as a
    /// configure failure.
    pub fn new(name: impl Into<String>, build_description_dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            build_description_dir: absolutize(build_description_dir.as_ref()),
        }
    }

    /// Descriptor for one of the fixed backends
    pub fn for_backend(backend: Backend, project_root: &Path) -> Self {
        Self::new(
            backend.extension_name(),
            project_root.join(backend.build_description_dir()),
        )
    }

    /// Package components of the dotted name (everything but the module itself)
    pub fn package_components(&self) -> impl Iterator<Item = &str> {
        let package = self.name.rsplit_once('.').map_or("", |(pkg, _)| pkg);
        package.split('.').filter(|c| !c.is_empty())
    }
}

/// Directories derived from a descriptor for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutputLayout {
    /// Where the compiled module must land
    pub ext_dir: PathBuf,
    /// Isolated working directory for this extension's build tree
    pub temp_dir: PathBuf,
    /// Output of the generated Python wrapper
    pub swig_output_dir: PathBuf,
    /// Intermediate generated wrapper sources
    pub swig_outfile_dir: PathBuf,
    /// Static archives
    pub archive_dir: PathBuf,
}

impl BuildOutputLayout {
    /// Compute the layout for `descriptor`.
    ///
    /// `ext_dir` is the directory of the extension's full path under
    /// `build_lib` (`build_lib/pysnark/libsnark` for `pysnark.libsnark.all`);
    /// `temp_dir` is `build_temp/<name>` so extensions never share build state.
    pub fn new(descriptor: &ExtensionDescriptor, build_lib: &Path, build_temp: &Path) -> Self {
        let mut ext_dir = absolutize(build_lib);
        for component in descriptor.package_components() {
            ext_dir.push(component);
        }
        let temp_dir = absolutize(&build_temp.join(&descriptor.name));

        Self {
            swig_output_dir: ext_dir.clone(),
            swig_outfile_dir: temp_dir.clone(),
            archive_dir: temp_dir.clone(),
            ext_dir,
            temp_dir,
        }
    }

    /// The `-D` definitions handed to the configure step: five output
    /// directories and the interpreter.
    pub fn cmake_defines(&self, python: &Path) -> Vec<OsString> {
        vec![
            define("CMAKE_LIBRARY_OUTPUT_DIRECTORY", &self.ext_dir),
            define("CMAKE_RUNTIME_OUTPUT_DIRECTORY", &self.ext_dir),
            define("CMAKE_SWIG_OUTDIR", &self.swig_output_dir),
            define("SWIG_OUTFILE_DIR", &self.swig_outfile_dir),
            define("CMAKE_ARCHIVE_OUTPUT_DIRECTORY", &self.archive_dir),
            define("PYTHON_EXECUTABLE", python),
        ]
    }
}

/// `-D<key>=<path>`, keeping the path's bytes as they are
fn define(key: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(format!("{FORWARD_PREFIX}{key}="));
    arg.push(path.as_os_str());
    arg
}

/// Absolute form of `path` without touching the filesystem.
///
/// Falls back to the path as given if the current directory is unavailable.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// A successfully built extension
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Extension name
    pub extension: String,
    /// Wall-clock time for configure + build
    pub duration: Duration,
    /// Directories used for the build
    pub layout: BuildOutputLayout,
}

/// Failure of a single generator invocation
#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", exit_description(.0))]
    Exit(Option<i32>),
}

fn exit_description(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |c| format!("exited with status {c}"),
    )
}

/// Errors from the native build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Cannot find CMake executable: {reason}")]
    ToolMissing { reason: String },

    #[error("Cannot find a Python interpreter (set PYTHON or pass --python)")]
    InterpreterMissing,

    #[error("Failed to create build directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CMake configure step failed for {extension}")]
    ConfigureFailure {
        extension: String,
        #[source]
        source: StepError,
    },

    #[error("CMake build step failed for {extension}")]
    BuildFailure {
        extension: String,
        #[source]
        source: StepError,
    },

    #[error("Failed to start build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
