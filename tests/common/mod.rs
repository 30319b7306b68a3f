//! Common test utilities and helpers
//!
//! - Binary path resolution (via `pysnark_build_binary`)
//! - An isolated command environment (via `isolated_command`)
//! - A scripted stand-in for `cmake` (via `fake_cmake`)

pub(crate) mod helpers;

#[allow(unused_imports)]
pub(crate) use helpers::{configure_args, isolated_command, pysnark_build_binary, read_log};

#[cfg(unix)]
#[allow(unused_imports)]
pub(crate) use helpers::fake_cmake;
