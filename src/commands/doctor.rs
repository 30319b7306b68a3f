//! Doctor command - Diagnose a native build before running it
//!
//! Checks, for the selected backends only:
//! - `CMake` is present and reports a version
//! - A Python interpreter can be found
//! - Each backend's `CMakeLists.txt` exists

use super::Invocation;
use anyhow::Result;
use pysnark_build::extensions::{BuildGenerator, CMake, ExtensionDescriptor, parse_version};
use pysnark_build::{Backend, tools};
use std::path::PathBuf;

/// Extensions whose build description has no `CMakeLists.txt`
pub(crate) fn missing_build_descriptions(
    descriptors: &[ExtensionDescriptor],
) -> Vec<&ExtensionDescriptor> {
    descriptors
        .iter()
        .filter(|d| !d.build_description_dir.join("CMakeLists.txt").is_file())
        .collect()
}

/// Run the doctor command to diagnose common problems.
pub(crate) fn run(
    invocation: &Invocation,
    cmake: Option<PathBuf>,
    python: Option<PathBuf>,
) -> Result<()> {
    let quiet = invocation.quiet;
    let manifest = invocation.manifest();

    if !quiet {
        println!("Checking native build environment...");
        println!();
        for backend in Backend::ALL {
            let state = if invocation.selection.includes(backend) {
                "selected"
            } else {
                "disabled"
            };
            println!("• {backend}: {state}");
        }
    }

    if !manifest.needs_native_build() {
        if !quiet {
            println!("No native backends selected; CMake is not required");
        }
        return Ok(());
    }

    let config = &invocation.config;
    let mut problems = 0_usize;

    match CMake::locate(cmake.as_deref().or(config.cmake.as_deref()))
        .and_then(|cmake| cmake.version().map(|banner| (cmake, banner)))
    {
        Ok((cmake, banner)) => {
            if !quiet {
                let version = parse_version(&banner)
                    .map_or_else(|| banner.clone(), |v| v.to_string());
                println!("CMake found: {} ({version})", cmake.path().display());
            }
        }
        Err(e) => {
            eprintln!("{e}");
            problems += 1;
        }
    }

    match tools::find_python(python.as_deref().or(config.python.as_deref())) {
        Some(path) if path.is_file() => {
            if !quiet {
                println!("Python interpreter: {}", path.display());
            }
        }
        Some(path) => {
            eprintln!("Python interpreter not found at {}", path.display());
            problems += 1;
        }
        None => {
            eprintln!("Python interpreter not found (set PYTHON or pass --python)");
            problems += 1;
        }
    }

    let missing = missing_build_descriptions(&manifest.ext_modules);
    for descriptor in &manifest.ext_modules {
        if missing.contains(&descriptor) {
            eprintln!(
                "Missing build description for {}: {}",
                descriptor.name,
                descriptor.build_description_dir.join("CMakeLists.txt").display()
            );
        } else if !quiet {
            println!("Build description found for {}", descriptor.name);
        }
    }
    problems += missing.len();

    if problems > 0 {
        anyhow::bail!("found {problems} problem(s) with the native build environment");
    }

    if !quiet {
        println!();
        println!("No problems found");
    }
    Ok(())
}
