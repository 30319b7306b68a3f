//! Backend selection
//!
//! PySNARK ships two optional native proof backends. Each is built unless its
//! `--disable-*` switch is given; nothing else influences inclusion.

use serde::Serialize;
use std::fmt;

/// One of the optional native backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// libsnark via its Python bindings
    Libsnark,
    /// qaptools
    Qaptools,
}

impl Backend {
    /// All backends in declaration order
    pub const ALL: [Self; 2] = [Self::Libsnark, Self::Qaptools];

    /// Short backend name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Libsnark => "libsnark",
            Self::Qaptools => "qaptools",
        }
    }

    /// Switch that excludes this backend
    pub const fn disable_flag(self) -> &'static str {
        match self {
            Self::Libsnark => "--disable-libsnark",
            Self::Qaptools => "--disable-qaptools",
        }
    }

    /// Installable sub-package exposing the backend
    pub const fn sub_package(self) -> &'static str {
        match self {
            Self::Libsnark => "pysnark.libsnark",
            Self::Qaptools => "pysnark.qaptools",
        }
    }

    /// Logical name of the compiled extension module
    pub const fn extension_name(self) -> &'static str {
        match self {
            Self::Libsnark => "pysnark.libsnark.all",
            Self::Qaptools => "pysnark.qaptools.all",
        }
    }

    /// Directory holding the backend's `CMakeLists.txt`, relative to the project root
    pub const fn build_description_dir(self) -> &'static str {
        match self {
            Self::Libsnark => "depends/python-libsnark",
            Self::Qaptools => "depends/qaptools",
        }
    }

    /// Package-data patterns declared for the sub-package, if any
    pub const fn package_data(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Libsnark => None,
            Self::Qaptools => Some(&[]),
        }
    }

    /// Look up the backend disabled by `flag`
    pub fn from_disable_flag(flag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.disable_flag() == flag)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Disable switches seen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendFlags {
    /// `--disable-libsnark` was given
    pub skip_libsnark: bool,
    /// `--disable-qaptools` was given
    pub skip_qaptools: bool,
}

/// Which backends will be built and installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub include_libsnark: bool,
    pub include_qaptools: bool,
}

impl Selection {
    /// Each backend is included unless its disable flag is set.
    pub const fn from_flags(flags: BackendFlags) -> Self {
        Self {
            include_libsnark: !flags.skip_libsnark,
            include_qaptools: !flags.skip_qaptools,
        }
    }

    /// Whether `backend` is part of this selection
    pub const fn includes(self, backend: Backend) -> bool {
        match backend {
            Backend::Libsnark => self.include_libsnark,
            Backend::Qaptools => self.include_qaptools,
        }
    }

    /// Included backends in declaration order
    pub fn backends(self) -> impl Iterator<Item = Backend> {
        Backend::ALL.into_iter().filter(move |b| self.includes(*b))
    }

    /// No native backend at all: the native build subsystem is absent.
    pub const fn is_empty(self) -> bool {
        !self.include_libsnark && !self.include_qaptools
    }
}
