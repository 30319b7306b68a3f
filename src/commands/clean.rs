//! Clean command
//!
//! Remove the temporary build trees of the selected extensions

use super::Invocation;
use anyhow::{Context, Result};
use pysnark_build::extensions::BuildOutputLayout;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Temporary build directories of the selected extensions that exist on disk
pub(crate) fn existing_build_dirs(invocation: &Invocation, build_temp: &Path) -> Vec<PathBuf> {
    let build_lib = invocation.config.build_lib(None);
    invocation
        .manifest()
        .ext_modules
        .iter()
        .map(|d| BuildOutputLayout::new(d, &build_lib, build_temp).temp_dir)
        .filter(|dir| dir.is_dir())
        .collect()
}

pub(crate) fn run(invocation: &Invocation, build_temp: Option<&Path>, dry_run: bool) -> Result<()> {
    let build_temp = invocation.config.build_temp(build_temp);
    let dirs = existing_build_dirs(invocation, &build_temp);

    if dirs.is_empty() {
        if !invocation.quiet {
            println!("Nothing to clean in {}", build_temp.display());
        }
        return Ok(());
    }

    let sized: Vec<(PathBuf, u64)> = dirs
        .into_par_iter()
        .map(|dir| {
            let size = calculate_dir_size(&dir);
            (dir, size)
        })
        .collect();

    let mut space_freed: u64 = 0;
    for (dir, size) in &sized {
        if dry_run {
            println!("Would remove {} ({})", dir.display(), format_bytes(*size));
        } else {
            fs::remove_dir_all(dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
            if !invocation.quiet {
                println!("Removed {} ({})", dir.display(), format_bytes(*size));
            }
        }
        space_freed += size;
    }

    if !invocation.quiet {
        let verb = if dry_run { "Would free" } else { "Freed" };
        println!("{verb} {}", format_bytes(space_freed));
    }

    Ok(())
}

/// Total size of regular files under `path`
fn calculate_dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Format byte count as human-readable string
#[allow(clippy::cast_precision_loss, reason = "display only")]
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    let unit = UNITS.get(exp).unwrap_or(&"B");

    format!("{value:.2} {unit}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests can panic")]
mod tests {
    use super::*;
    use pysnark_build::{Config, classify};
    use tempfile::TempDir;

    fn invocation(args: &[&str], root: &Path) -> Invocation {
        let config = Config {
            project_root: Some(root.to_path_buf()),
            ..Config::default()
        };
        Invocation::new(classify(args.iter().copied()).unwrap(), config, true)
    }

    fn populate(build_temp: &Path, name: &str) -> PathBuf {
        let dir = build_temp.join(name);
        fs::create_dir_all(dir.join("CMakeFiles")).unwrap();
        fs::write(dir.join("CMakeCache.txt"), "hello").unwrap();
        fs::write(dir.join("CMakeFiles/rules.make"), "abc").unwrap();
        dir
    }

    #[test]
    fn removes_selected_build_dirs() {
        let temp = TempDir::new().unwrap();
        let build_temp = temp.path().join("build/temp");
        let lib = populate(&build_temp, "pysnark.libsnark.all");
        let qap = populate(&build_temp, "pysnark.qaptools.all");

        run(&invocation(&[], temp.path()), None, false).unwrap();

        assert!(!lib.exists());
        assert!(!qap.exists());
        assert!(build_temp.exists());
    }

    #[test]
    fn disabled_backend_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let build_temp = temp.path().join("build/temp");
        let lib = populate(&build_temp, "pysnark.libsnark.all");
        let qap = populate(&build_temp, "pysnark.qaptools.all");

        run(&invocation(&["--disable-qaptools"], temp.path()), None, false).unwrap();

        assert!(!lib.exists());
        assert!(qap.exists());
    }

    #[test]
    fn dry_run_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let build_temp = temp.path().join("custom");
        let lib = populate(&build_temp, "pysnark.libsnark.all");

        run(&invocation(&[], temp.path()), Some(&build_temp), true).unwrap();
        assert!(lib.exists());
    }

    #[test]
    fn nothing_to_clean() {
        let temp = TempDir::new().unwrap();
        assert!(run(&invocation(&[], temp.path()), None, false).is_ok());
    }

    #[test]
    fn dir_size_counts_nested_files() {
        let temp = TempDir::new().unwrap();
        let dir = populate(temp.path(), "x");
        assert_eq!(calculate_dir_size(&dir), 8);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
    }
}
