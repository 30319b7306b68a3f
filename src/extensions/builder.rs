//! Extension build driver
//!
//! Invoked by the `build-ext` hook once the manifest is known. For every
//! descriptor: compute the output layout, create the temporary build
//! directory, configure, then build. The generator is checked once before any
//! descriptor is touched.

use super::cmake_extension::BuildGenerator;
use super::types::{BuildError, BuildOutputLayout, BuildResult, ExtensionDescriptor};
use rayon::prelude::*;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Output roots shared by all extensions of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirs {
    /// Root under which compiled modules land
    pub build_lib: PathBuf,
    /// Root of the per-extension temporary build trees
    pub build_temp: PathBuf,
}

/// Builds extension descriptors with a [`BuildGenerator`]
#[derive(Debug)]
pub struct ExtensionBuilder<G> {
    generator: G,
    /// Interpreter passed as `PYTHON_EXECUTABLE`
    python: PathBuf,
    dirs: BuildDirs,
    /// User `-D` flags, appended after the computed defines
    forwarded: Vec<String>,
    /// Extensions built concurrently
    jobs: usize,
    /// Suppress progress lines
    quiet: bool,
}

impl<G: BuildGenerator> ExtensionBuilder<G> {
    /// Create a sequential builder.
    pub fn new(
        generator: G,
        python: impl Into<PathBuf>,
        dirs: BuildDirs,
        forwarded: Vec<String>,
    ) -> Self {
        Self {
            generator,
            python: python.into(),
            dirs,
            forwarded,
            jobs: 1,
            quiet: false,
        }
    }

    /// Build up to `jobs` extensions at once.
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Suppress progress output (child tool output is still shown).
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The generator in use
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Output layout for `descriptor`
    pub fn layout(&self, descriptor: &ExtensionDescriptor) -> BuildOutputLayout {
        BuildOutputLayout::new(descriptor, &self.dirs.build_lib, &self.dirs.build_temp)
    }

    /// Arguments of the configure step after the source directory: the six
    /// computed defines, then every forwarded flag in its original order.
    /// Duplicates are kept; `CMake` applies the last one.
    pub fn configure_args(&self, layout: &BuildOutputLayout) -> Vec<OsString> {
        let mut args = layout.cmake_defines(&self.python);
        args.extend(self.forwarded.iter().map(OsString::from));
        args
    }

    /// Build all `descriptors`.
    ///
    /// The generator check runs once, before any descriptor. An empty list
    /// never touches the generator. The first failure aborts the run.
    pub fn build_all(
        &self,
        descriptors: &[ExtensionDescriptor],
    ) -> Result<Vec<BuildResult>, BuildError> {
        if descriptors.is_empty() {
            return Ok(Vec::new());
        }

        let banner = self.generator.version()?;
        crate::debug!("build generator: {banner}");

        if self.jobs > 1 && descriptors.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs.min(descriptors.len()))
                .build()?;
            pool.install(|| descriptors.par_iter().map(|d| self.build(d)).collect())
        } else {
            descriptors.iter().map(|d| self.build(d)).collect()
        }
    }

    /// Configure and build one extension.
    ///
    /// Does not check the generator; [`Self::build_all`] does that once.
    pub fn build(&self, descriptor: &ExtensionDescriptor) -> Result<BuildResult, BuildError> {
        let start_time = Instant::now();
        let layout = self.layout(descriptor);

        if !self.quiet {
            println!("Building {}", descriptor.name);
        }
        crate::debug!("{}: layout {:?}", descriptor.name, layout);

        ensure_dir(&layout.temp_dir)?;

        let args = self.configure_args(&layout);
        self.generator
            .configure(&descriptor.build_description_dir, &layout.temp_dir, &args)
            .map_err(|source| BuildError::ConfigureFailure {
                extension: descriptor.name.clone(),
                source,
            })?;

        self.generator
            .build(&layout.temp_dir)
            .map_err(|source| BuildError::BuildFailure {
                extension: descriptor.name.clone(),
                source,
            })?;

        let duration = start_time.elapsed();
        if !self.quiet {
            println!("Built {} in {:.1}s", descriptor.name, duration.as_secs_f64());
        }

        Ok(BuildResult {
            extension: descriptor.name.clone(),
            duration,
            layout,
        })
    }

    /// Number of extensions built and their total build time
    pub fn summarize(results: &[BuildResult]) -> (usize, Duration) {
        (results.len(), results.iter().map(|r| r.duration).sum())
    }
}

fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(path).map_err(|source| BuildError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
