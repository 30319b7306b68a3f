//! Shared test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled `pysnark-build` binary
pub(crate) fn pysnark_build_binary() -> &'static str {
    env!("CARGO_BIN_EXE_pysnark-build")
}

/// Command running in `temp` with no config or tool overrides leaking in
/// from the developer's environment.
pub(crate) fn isolated_command(temp: &TempDir) -> Command {
    let mut cmd = Command::new(pysnark_build_binary());
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .env_remove("PYSNARK_BUILD_CONFIG")
        .env_remove("PYSNARK_BUILD_DEBUG")
        .env_remove("PYSNARK_BUILD_JOBS")
        .env_remove("CMAKE")
        .env_remove("PYTHON");
    cmd
}

/// Write an executable `cmake` stand-in into `dir`.
///
/// `--version` prints a banner without logging. Every other invocation
/// appends `cwd=...`, one `arg=...` line per argument and `end` to the file
/// named by `FAKE_CMAKE_LOG`. A configure call exits 3 when
/// `FAKE_CMAKE_FAIL_CONFIGURE` is set.
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn fake_cmake(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-cmake");
    fs::write(
        &script,
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "cmake version 3.28.1"
    exit 0
fi
{
    echo "cwd=$(pwd)"
    for a in "$@"; do
        echo "arg=$a"
    done
    echo "end"
} >> "$FAKE_CMAKE_LOG"
if [ "$1" != "--build" ] && [ -n "$FAKE_CMAKE_FAIL_CONFIGURE" ]; then
    echo "CMake Error: simulated configure failure" >&2
    exit 3
fi
exit 0
"#,
    )
    .expect("Failed to write fake cmake");

    let mut perms = fs::metadata(&script)
        .expect("Failed to stat fake cmake")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("Failed to chmod fake cmake");
    script
}

/// Invocations recorded by the fake `cmake`: (cwd, args) per call
#[allow(dead_code)]
pub(crate) fn read_log(log: &Path) -> Vec<(String, Vec<String>)> {
    let content = fs::read_to_string(log).unwrap_or_default();
    let mut calls = Vec::new();
    let mut cwd = String::new();
    let mut args = Vec::new();

    for line in content.lines() {
        if let Some(dir) = line.strip_prefix("cwd=") {
            cwd = dir.to_string();
        } else if let Some(arg) = line.strip_prefix("arg=") {
            args.push(arg.to_string());
        } else if line == "end" {
            calls.push((std::mem::take(&mut cwd), std::mem::take(&mut args)));
        }
    }

    calls
}

/// Argument lists of the configure calls (everything that is not `--build`)
#[allow(dead_code)]
pub(crate) fn configure_args(calls: &[(String, Vec<String>)]) -> Vec<Vec<String>> {
    calls
        .iter()
        .filter(|(_, args)| args.first().map(String::as_str) != Some("--build"))
        .map(|(_, args)| args.clone())
        .collect()
}
