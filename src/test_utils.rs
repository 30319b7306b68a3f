//! Shared test utilities
//!
//! A [`RecordingGenerator`] stands in for `CMake` so driver tests can assert
//! on exact invocations without a native toolchain.

use crate::extensions::{BuildError, BuildGenerator, StepError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded generator invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Version,
    Configure {
        source_dir: PathBuf,
        work_dir: PathBuf,
        args: Vec<OsString>,
    },
    Build {
        work_dir: PathBuf,
    },
}

/// Generator double that records calls and fails on request
#[derive(Debug, Default)]
pub(crate) struct RecordingGenerator {
    calls: Mutex<Vec<Call>>,
    missing: bool,
    fail_configure: Option<String>,
    fail_build: Option<String>,
}

impl RecordingGenerator {
    /// A generator whose version check fails
    pub(crate) fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// Fail the configure step when the source dir contains `pattern`
    pub(crate) fn fail_configure(mut self, pattern: &str) -> Self {
        self.fail_configure = Some(pattern.to_string());
        self
    }

    /// Fail the build step when the work dir contains `pattern`
    pub(crate) fn fail_build(mut self, pattern: &str) -> Self {
        self.fail_build = Some(pattern.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Arguments of every configure call, in call order
    pub(crate) fn configure_args(&self) -> Vec<Vec<OsString>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Configure { args, .. } => Some(args),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn hits(pattern: Option<&String>, path: &Path) -> bool {
    pattern.is_some_and(|p| path.to_string_lossy().contains(p.as_str()))
}

impl BuildGenerator for RecordingGenerator {
    fn version(&self) -> Result<String, BuildError> {
        self.record(Call::Version);
        if self.missing {
            return Err(BuildError::ToolMissing {
                reason: "recording generator marked missing".to_string(),
            });
        }
        Ok("cmake version 3.28.1".to_string())
    }

    fn configure(
        &self,
        source_dir: &Path,
        work_dir: &Path,
        args: &[OsString],
    ) -> Result<(), StepError> {
        self.record(Call::Configure {
            source_dir: source_dir.to_path_buf(),
            work_dir: work_dir.to_path_buf(),
            args: args.to_vec(),
        });
        if hits(self.fail_configure.as_ref(), source_dir) {
            return Err(StepError::Exit(Some(1)));
        }
        Ok(())
    }

    fn build(&self, work_dir: &Path) -> Result<(), StepError> {
        self.record(Call::Build {
            work_dir: work_dir.to_path_buf(),
        });
        if hits(self.fail_build.as_ref(), work_dir) {
            return Err(StepError::Exit(Some(2)));
        }
        Ok(())
    }
}
