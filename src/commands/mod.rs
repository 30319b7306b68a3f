//! Subcommands of the `pysnark-build` binary

use pysnark_build::{ClassifiedArgs, Config, PackageManifest, Selection};
use std::path::PathBuf;

pub(crate) mod build_ext;
pub(crate) mod clean;
pub(crate) mod completion;
pub(crate) mod doctor;
pub(crate) mod manifest;

/// State shared by every subcommand of one invocation
#[derive(Debug)]
pub(crate) struct Invocation {
    /// `-D` flags for the configure step
    pub(crate) forwarded: Vec<String>,
    pub(crate) selection: Selection,
    pub(crate) qaptools_bin: Option<PathBuf>,
    pub(crate) config: Config,
    pub(crate) quiet: bool,
}

impl Invocation {
    pub(crate) fn new(classified: ClassifiedArgs, config: Config, quiet: bool) -> Self {
        Self {
            forwarded: classified.forwarded,
            selection: Selection::from_flags(classified.flags),
            qaptools_bin: classified.qaptools_bin,
            config,
            quiet,
        }
    }

    /// Manifest for this invocation's backend selection
    pub(crate) fn manifest(&self) -> PackageManifest {
        PackageManifest::assemble(
            self.selection,
            &self.config.project_root(),
            self.qaptools_bin.clone(),
        )
    }
}
