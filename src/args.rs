//! Tool-specific command-line flags
//!
//! The `setup`-style entry point shares its argument list with the packaging
//! CLI. Before that CLI sees anything, [`classify`] pulls out the flags that
//! belong to the native build:
//!
//! - `-D<key>=<value>`: forwarded verbatim to the `CMake` configure step
//! - `--disable-libsnark`, `--disable-qaptools`: exclude a backend
//! - `--qaptools-bin=<path>`: precompiled qaptools location
//! - `-h`/`--help`: detected but left in place so the packaging CLI prints
//!   its own help as well
//!
//! Classification is a single filtering pass; the input is never mutated.

use crate::backend::{Backend, BackendFlags};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix of flags forwarded to the build generator
pub const FORWARD_PREFIX: &str = "-D";

/// Flag carrying the precompiled qaptools path
pub const QAPTOOLS_BIN_FLAG: &str = "--qaptools-bin";

/// Errors raised while classifying tool flags
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("malformed flag `{flag}`: {reason}")]
    MalformedFlag { flag: String, reason: &'static str },

    #[error("flag `{flag}` is not valid UTF-8")]
    NotUnicode { flag: String },
}

/// Result of splitting the raw argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedArgs {
    /// Arguments left for the packaging CLI, in their original order
    pub remainder: Vec<OsString>,
    /// `-D` flags for the configure step, in their original order
    pub forwarded: Vec<String>,
    /// Which backends were disabled
    pub flags: BackendFlags,
    /// First `--qaptools-bin=` value, if any
    pub qaptools_bin: Option<PathBuf>,
    /// `-h` or `--help` was present
    pub help_requested: bool,
}

/// Split `args` into tool flags and the remainder.
///
/// Only the first `--qaptools-bin=` is consumed. Any later occurrence stays in
/// the remainder and reaches the packaging CLI unrecognized, matching the
/// `setup.py` entry point this replaces.
///
/// Arguments that are not valid UTF-8 pass through untouched unless they look
/// like one of our flags, which is an error.
pub fn classify<I, S>(args: I) -> Result<ClassifiedArgs, ArgsError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut out = ClassifiedArgs::default();

    for arg in args {
        let arg = arg.into();

        let Some(text) = arg.to_str() else {
            let lossy = arg.to_string_lossy();
            if lossy.starts_with(FORWARD_PREFIX)
                || (out.qaptools_bin.is_none() && lossy.starts_with(QAPTOOLS_BIN_FLAG))
            {
                return Err(ArgsError::NotUnicode {
                    flag: lossy.into_owned(),
                });
            }
            out.remainder.push(arg);
            continue;
        };

        if text.starts_with(FORWARD_PREFIX) {
            validate_define(text)?;
            out.forwarded.push(text.to_string());
            continue;
        }

        if let Some(backend) = Backend::from_disable_flag(text) {
            match backend {
                Backend::Libsnark => out.flags.skip_libsnark = true,
                Backend::Qaptools => out.flags.skip_qaptools = true,
            }
            continue;
        }

        if out.qaptools_bin.is_none()
            && let Some(value) = qaptools_bin_value(text)?
        {
            out.qaptools_bin = Some(PathBuf::from(value));
            continue;
        }

        if text == "-h" || text == "--help" {
            out.help_requested = true;
        }

        out.remainder.push(arg);
    }

    Ok(out)
}

/// `-D` needs a non-empty key and an `=`.
fn validate_define(arg: &str) -> Result<(), ArgsError> {
    let payload = arg.get(FORWARD_PREFIX.len()..).unwrap_or_default();
    match payload.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(()),
        Some(_) => Err(ArgsError::MalformedFlag {
            flag: arg.to_string(),
            reason: "expected -D<key>=<value> with a non-empty key",
        }),
        None => Err(ArgsError::MalformedFlag {
            flag: arg.to_string(),
            reason: "expected -D<key>=<value>",
        }),
    }
}

/// Extract the value of a `--qaptools-bin=<path>` token.
///
/// Returns `Ok(None)` for unrelated tokens. Both the bare flag and an empty
/// value are rejected.
fn qaptools_bin_value(arg: &str) -> Result<Option<&str>, ArgsError> {
    let Some(rest) = arg.strip_prefix(QAPTOOLS_BIN_FLAG) else {
        return Ok(None);
    };

    if rest.is_empty() {
        return Err(ArgsError::MalformedFlag {
            flag: arg.to_string(),
            reason: "expected --qaptools-bin=<path>",
        });
    }

    // `--qaptools-binary` and similar are not ours
    let Some(value) = rest.strip_prefix('=') else {
        return Ok(None);
    };

    if value.is_empty() {
        return Err(ArgsError::MalformedFlag {
            flag: arg.to_string(),
            reason: "path must not be empty",
        });
    }

    Ok(Some(value))
}

/// Usage block for the tool-specific options.
pub fn usage() -> String {
    let mut text = String::from("PySNARK build options:\n\n");
    for backend in Backend::ALL {
        text.push_str(&format!(
            "  {:<22} disable {} backend\n",
            backend.disable_flag(),
            backend.name()
        ));
    }
    text.push_str(&format!(
        "  {:<22} use precompiled qaptools from given directory\n",
        format!("{QAPTOOLS_BIN_FLAG}=...")
    ));
    text.push_str(&format!(
        "  {:<22} arguments for cmake compilation of libsnark/qaptools\n",
        format!("{FORWARD_PREFIX}...")
    ));
    text
}
