//! `CMake` as the build generator
//!
//! Each extension is built with two invocations, both run inside the
//! extension's temporary build directory:
//! ```bash
//! cmake <build_description_dir> -D<output dirs...> -DPYTHON_EXECUTABLE=... -D<forwarded...>
//! cmake --build .
//! ```
//! Child output is inherited, so compiler diagnostics reach the user verbatim.

use super::types::{BuildError, StepError};
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static VERSION_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"cmake3? version (\d+\.\d+\.\d+)").ok());

/// External tool turning a native build description into compiled artifacts
///
/// The driver only ever talks to the generator through this trait, which
/// lets tests substitute a recorder for the real `CMake`.
pub trait BuildGenerator: Sync {
    /// Check the tool is invocable and return its version banner.
    fn version(&self) -> Result<String, BuildError>;

    /// Configure `source_dir` into `work_dir` with `args`.
    fn configure(
        &self,
        source_dir: &Path,
        work_dir: &Path,
        args: &[OsString],
    ) -> Result<(), StepError>;

    /// Build everything configured in `work_dir`.
    fn build(&self, work_dir: &Path) -> Result<(), StepError>;
}

/// `CMake` executable
#[derive(Debug, Clone)]
pub struct CMake {
    /// Path to `CMake` executable
    cmake_path: PathBuf,
}

impl CMake {
    /// Use the given executable without checking it.
    pub fn new(cmake_path: impl Into<PathBuf>) -> Self {
        Self {
            cmake_path: cmake_path.into(),
        }
    }

    /// Find `CMake` on the system.
    ///
    /// Priority order:
    /// 1. `explicit` (`--cmake` or the config file)
    /// 2. `CMAKE` environment variable
    /// 3. `cmake` in `PATH`
    pub fn locate(explicit: Option<&Path>) -> Result<Self, BuildError> {
        crate::tools::find_executable(explicit, crate::env_vars::cmake(), &["cmake"])
            .map(Self::new)
            .ok_or_else(|| BuildError::ToolMissing {
                reason: "not found in PATH or CMAKE environment variable".to_string(),
            })
    }

    /// Path of the executable
    pub fn path(&self) -> &Path {
        &self.cmake_path
    }

    fn command(&self) -> Command {
        Command::new(&self.cmake_path)
    }

    fn run(&self, mut cmd: Command) -> Result<(), StepError> {
        crate::debug::debug_command(&cmd);
        let status = cmd.status().map_err(|source| StepError::Spawn {
            program: self.cmake_path.display().to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(StepError::Exit(status.code()))
        }
    }
}

impl BuildGenerator for CMake {
    fn version(&self) -> Result<String, BuildError> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .map_err(|e| BuildError::ToolMissing {
                reason: format!("{}: {e}", self.cmake_path.display()),
            })?;

        if !output.status.success() {
            return Err(BuildError::ToolMissing {
                reason: format!(
                    "`{} --version` exited unsuccessfully",
                    self.cmake_path.display()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn configure(
        &self,
        source_dir: &Path,
        work_dir: &Path,
        args: &[OsString],
    ) -> Result<(), StepError> {
        let mut cmd = self.command();
        cmd.arg(source_dir).args(args).current_dir(work_dir);
        self.run(cmd)
    }

    fn build(&self, work_dir: &Path) -> Result<(), StepError> {
        let mut cmd = self.command();
        cmd.args(["--build", "."]).current_dir(work_dir);
        self.run(cmd)
    }
}

/// Parse the version out of a `cmake --version` banner.
pub fn parse_version(banner: &str) -> Option<semver::Version> {
    let captures = VERSION_LINE.as_ref()?.captures(banner)?;
    semver::Version::parse(captures.get(1)?.as_str()).ok()
}
