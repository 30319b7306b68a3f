//! Debug logging
//!
//! Debug output is switched on by the global `--debug` flag or by
//! `PYSNARK_BUILD_DEBUG`. When it is off, the `debug!` macro costs one
//! atomic load.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode. The first call wins; later calls are ignored.
///
/// The environment variable is consulted here so that `--debug` and
/// `PYSNARK_BUILD_DEBUG=1` behave identically.
pub fn init_debug(flag: bool) {
    let enabled = flag || crate::env_vars::debug_requested();
    let _ = DEBUG_ENABLED.set(enabled);
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Print a debug message if debug mode is enabled
pub fn debug_log(message: &str) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {message}");
    }
}

/// Log a command line about to be spawned, quoting arguments that contain spaces.
pub fn debug_command(cmd: &std::process::Command) {
    if !is_debug_enabled() {
        return;
    }

    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        let arg = arg.to_string_lossy();
        line.push(' ');
        if arg.contains(' ') {
            line.push('"');
            line.push_str(&arg);
            line.push('"');
        } else {
            line.push_str(&arg);
        }
    }
    if let Some(dir) = cmd.get_current_dir() {
        eprintln!("[DEBUG] (in {}) {line}", dir.display());
    } else {
        eprintln!("[DEBUG] {line}");
    }
}

/// Macro for convenient debug logging
///
/// Usage: `debug!("configuring {}", name)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}
