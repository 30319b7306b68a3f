//! Manifest command
//!
//! Print the package manifest consumed by the packaging tool

use super::Invocation;
use anyhow::{Context, Result};
use clap::ValueEnum;

/// Output format of the manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ManifestFormat {
    #[default]
    Json,
    Toml,
}

/// Render the manifest for the current selection.
pub(crate) fn render(invocation: &Invocation, format: ManifestFormat) -> Result<String> {
    let manifest = invocation.manifest();
    match format {
        ManifestFormat::Json => {
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest as JSON")
        }
        ManifestFormat::Toml => {
            toml::to_string_pretty(&manifest).context("Failed to serialize manifest as TOML")
        }
    }
}

pub(crate) fn run(invocation: &Invocation, format: ManifestFormat) -> Result<()> {
    println!("{}", render(invocation, format)?);
    Ok(())
}
