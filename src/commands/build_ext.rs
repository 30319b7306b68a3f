//! Build-ext command
//!
//! The packaging tool's extension-build hook: configure and build every
//! selected backend with `CMake`.

use super::Invocation;
use anyhow::Result;
use pysnark_build::extensions::{BuildDirs, BuildError, CMake, ExtensionBuilder};
use pysnark_build::tools;
use std::path::PathBuf;

/// Flags of the `build-ext` command
#[derive(Debug, Default)]
pub(crate) struct BuildExtOptions {
    pub(crate) build_lib: Option<PathBuf>,
    pub(crate) build_temp: Option<PathBuf>,
    pub(crate) inplace: bool,
    pub(crate) jobs: Option<usize>,
    pub(crate) cmake: Option<PathBuf>,
    pub(crate) python: Option<PathBuf>,
}

impl BuildExtOptions {
    /// Output roots: `--inplace` puts modules next to the package sources.
    fn dirs(&self, invocation: &Invocation) -> BuildDirs {
        let config = &invocation.config;
        let build_lib = if self.inplace {
            config.project_root()
        } else {
            config.build_lib(self.build_lib.as_deref())
        };
        BuildDirs {
            build_lib,
            build_temp: config.build_temp(self.build_temp.as_deref()),
        }
    }
}

pub(crate) fn run(invocation: &Invocation, options: &BuildExtOptions) -> Result<()> {
    let manifest = invocation.manifest();

    if !manifest.needs_native_build() {
        pysnark_build::debug_log("manifest has no build hook, CMake not consulted");
        if !invocation.quiet {
            println!("No native backends selected, skipping extension build");
        }
        return Ok(());
    }

    if let Some(bin) = &manifest.qaptools_bin {
        pysnark_build::debug!("precompiled qaptools requested at {}", bin.display());
    }

    let config = &invocation.config;
    let cmake = CMake::locate(options.cmake.as_deref().or(config.cmake.as_deref()))?;
    let python = tools::find_python(options.python.as_deref().or(config.python.as_deref()))
        .ok_or(BuildError::InterpreterMissing)?;
    pysnark_build::debug!("python: {}", python.display());

    let builder = ExtensionBuilder::new(
        cmake,
        python,
        options.dirs(invocation),
        invocation.forwarded.clone(),
    )
    .with_jobs(config.jobs(options.jobs))
    .quiet(invocation.quiet);
    pysnark_build::debug!("cmake: {}", builder.generator().path().display());

    let results = builder.build_all(&manifest.ext_modules)?;

    if !invocation.quiet {
        let (count, total) = ExtensionBuilder::<CMake>::summarize(&results);
        println!("Built {count} extension(s) in {:.1}s", total.as_secs_f64());
        for result in &results {
            println!("  {} -> {}", result.extension, result.layout.ext_dir.display());
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use pysnark_build::{Config, classify};
    use std::path::Path;

    fn invocation(args: &[&str], config: Config) -> Invocation {
        Invocation::new(classify(args.iter().copied()).unwrap(), config, true)
    }

    #[test]
    fn nothing_selected_needs_no_cmake() {
        let invocation = invocation(
            &["--disable-libsnark", "--disable-qaptools"],
            Config::default(),
        );
        let options = BuildExtOptions {
            cmake: Some(PathBuf::from("/nonexistent/cmake")),
            ..BuildExtOptions::default()
        };

        assert!(run(&invocation, &options).is_ok());
    }

    #[test]
    fn missing_cmake_fails_before_building() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config {
            project_root: Some(temp.path().to_path_buf()),
            ..Config::default()
        };
        let invocation = invocation(&["--disable-qaptools"], config);
        let options = BuildExtOptions {
            cmake: Some(PathBuf::from("/nonexistent/cmake")),
            python: Some(PathBuf::from("/usr/bin/python3")),
            ..BuildExtOptions::default()
        };

        let err = run(&invocation, &options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ToolMissing { .. })
        ));
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn inplace_uses_project_root() {
        let config = Config {
            project_root: Some(PathBuf::from("/src/pysnark")),
            ..Config::default()
        };
        let invocation = invocation(&[], config);
        let options = BuildExtOptions {
            inplace: true,
            ..BuildExtOptions::default()
        };

        let dirs = options.dirs(&invocation);
        assert_eq!(dirs.build_lib, Path::new("/src/pysnark"));
        assert_eq!(dirs.build_temp, Path::new("/src/pysnark/build/temp"));
    }

    #[test]
    fn flags_override_config_dirs() {
        let invocation = invocation(&[], Config::default());
        let options = BuildExtOptions {
            build_lib: Some(PathBuf::from("/out/lib")),
            build_temp: Some(PathBuf::from("/out/tmp")),
            ..BuildExtOptions::default()
        };

        let dirs = options.dirs(&invocation);
        assert_eq!(dirs.build_lib, Path::new("/out/lib"));
        assert_eq!(dirs.build_temp, Path::new("/out/tmp"));
    }
}
