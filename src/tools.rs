//! Locating external executables

use std::path::{Path, PathBuf};
use std::process::Command;

/// Find an executable.
///
/// Priority order:
/// 1. `explicit` (command-line flag or config file), returned as given
/// 2. `from_env`, if that path exists
/// 3. the first of `names` found in `PATH`
pub fn find_executable(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    names: &[&str],
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = from_env
        && path.exists()
    {
        return Some(path);
    }

    names.iter().find_map(|name| which(name))
}

/// Look `name` up in `PATH` via `which`.
fn which(name: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(name).output().ok()?;
    output.status.success().then_some(())?;

    let path_str = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(path_str.trim());
    (!path.as_os_str().is_empty() && path.exists()).then_some(path)
}

/// Find the Python interpreter handed to `CMake` as `PYTHON_EXECUTABLE`.
///
/// Order: `explicit` -> `PYTHON` -> `python3` -> `python` in `PATH`.
pub fn find_python(explicit: Option<&Path>) -> Option<PathBuf> {
    find_executable(explicit, crate::env_vars::python(), &["python3", "python"])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins_even_if_missing() {
        let found = find_executable(
            Some(Path::new("/nowhere/cmake")),
            Some(PathBuf::from("/also/nowhere")),
            &["cmake"],
        );
        assert_eq!(found, Some(PathBuf::from("/nowhere/cmake")));
    }

    #[test]
    fn existing_env_path_is_used() {
        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("tool");
        std::fs::write(&tool, "").unwrap();

        let found = find_executable(None, Some(tool.clone()), &[]);
        assert_eq!(found, Some(tool));
    }

    #[test]
    fn missing_env_path_falls_through() {
        let found = find_executable(
            None,
            Some(PathBuf::from("/definitely/not/here")),
            &["pysnark-build-no-such-tool"],
        );
        assert_eq!(found, None);
    }
}
