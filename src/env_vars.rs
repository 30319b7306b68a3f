//! Environment variable handling.
//!
//! Environment values sit between command-line flags and the config file in
//! precedence.

use std::env;
use std::path::PathBuf;

// Boolean variables accept "1", "true", "yes" (case-insensitive)
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Explicit `CMake` executable (`CMAKE`).
pub fn cmake() -> Option<PathBuf> {
    non_empty("CMAKE").map(PathBuf::from)
}

/// Explicit Python interpreter (`PYTHON`).
pub fn python() -> Option<PathBuf> {
    non_empty("PYTHON").map(PathBuf::from)
}

/// Check whether `PYSNARK_BUILD_DEBUG` asks for debug output.
pub fn debug_requested() -> bool {
    is_enabled("PYSNARK_BUILD_DEBUG")
}

/// Number of parallel extension builds (`PYSNARK_BUILD_JOBS`), ignored if invalid.
pub fn build_jobs() -> Option<usize> {
    env::var("PYSNARK_BUILD_JOBS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|&n: &usize| n > 0)
}

/// Config file override (`PYSNARK_BUILD_CONFIG`).
pub fn config_file() -> Option<PathBuf> {
    non_empty("PYSNARK_BUILD_CONFIG").map(PathBuf::from)
}
