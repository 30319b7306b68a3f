//! Configuration file management
//!
//! Reads the optional TOML configuration from the project or the user's
//! config directory. Every key is optional; command-line flags and
//! environment variables override what is found here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".pysnark-build.toml";

/// Default directory for compiled extension modules, relative to the project root
pub const DEFAULT_BUILD_LIB: &str = "build/lib";

/// Default directory for per-extension intermediate build trees
pub const DEFAULT_BUILD_TEMP: &str = "build/temp";

/// Application configuration loaded from TOML files
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing `depends/` (defaults to the current directory)
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    /// Output directory for compiled modules
    #[serde(default)]
    pub build_lib: Option<PathBuf>,

    /// Directory holding per-extension temporary build trees
    #[serde(default)]
    pub build_temp: Option<PathBuf>,

    /// `CMake` executable
    #[serde(default)]
    pub cmake: Option<PathBuf>,

    /// Python interpreter passed to `CMake` as `PYTHON_EXECUTABLE`
    #[serde(default)]
    pub python: Option<PathBuf>,

    /// Number of extensions built concurrently
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration with custom options.
    ///
    /// Priority: `custom_path` -> `PYSNARK_BUILD_CONFIG` -> `./.pysnark-build.toml`
    /// -> `$XDG_CONFIG_HOME/pysnark-build/config.toml` -> defaults.
    ///
    /// An explicitly named file must exist and parse. Discovered files that
    /// fail to parse are reported rather than silently skipped.
    pub fn load_with_options(custom_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        if let Some(path) = crate::env_vars::config_file() {
            return Self::load_from(&path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(&local);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.is_file() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        crate::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn user_config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("pysnark-build"));
        }

        dirs::home_dir().map(|home| home.join(".config").join("pysnark-build"))
    }

    /// Project root, defaulting to the current directory
    pub fn project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve the `build_lib` directory, with `flag` taking precedence.
    pub fn build_lib(&self, flag: Option<&Path>) -> PathBuf {
        self.resolve_dir(flag, self.build_lib.as_deref(), DEFAULT_BUILD_LIB)
    }

    /// Resolve the `build_temp` directory, with `flag` taking precedence.
    pub fn build_temp(&self, flag: Option<&Path>) -> PathBuf {
        self.resolve_dir(flag, self.build_temp.as_deref(), DEFAULT_BUILD_TEMP)
    }

    /// Flag values are taken as given; config and default values are relative
    /// to the project root.
    fn resolve_dir(
        &self,
        flag: Option<&Path>,
        configured: Option<&Path>,
        default: &str,
    ) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        let relative = configured.unwrap_or_else(|| Path::new(default));
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.project_root().join(relative)
        }
    }

    /// Resolve the parallel job count: flag -> `PYSNARK_BUILD_JOBS` -> config -> 1.
    pub fn jobs(&self, flag: Option<usize>) -> usize {
        flag.or_else(crate::env_vars::build_jobs)
            .or(self.jobs)
            .unwrap_or(1)
            .max(1)
    }
}
