//! `pysnark-build` command-line interface
//!
//! Entry point standing in for the package's `setup` script. Tool flags
//! (`-D...`, `--disable-*`, `--qaptools-bin=`) may appear anywhere on the
//! command line and are removed before the subcommand is parsed.

use clap::{Parser, Subcommand};
use commands::Invocation;
use commands::build_ext::BuildExtOptions;
use commands::manifest::ManifestFormat;
use pysnark_build::{Config, classify, usage};
use std::path::PathBuf;
use std::process;

/// Display an error and its chain of causes
fn display_error(err: &anyhow::Error) {
    eprintln!("error: {err}");

    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }
}

#[derive(Parser)]
#[command(name = "pysnark-build")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build the optional native PySNARK backends", long_about = None)]
pub(crate) struct Cli {
    /// Print debug output (also enabled by PYSNARK_BUILD_DEBUG=1)
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress all output except errors and build tool output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file (default: ./.pysnark-build.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the package manifest (packages, package data, extensions, build hook)
    Manifest {
        /// Output format
        #[arg(long, value_enum, default_value_t = ManifestFormat::Json)]
        format: ManifestFormat,
    },

    /// Configure and build the selected native backends with CMake
    #[command(name = "build-ext", visible_alias = "build_ext")]
    BuildExt {
        /// Directory for compiled extension modules
        #[arg(long, short = 'b', value_name = "DIR")]
        build_lib: Option<PathBuf>,

        /// Directory for temporary build trees
        #[arg(long, short = 't', value_name = "DIR")]
        build_temp: Option<PathBuf>,

        /// Put compiled modules next to the package sources
        #[arg(long, short = 'i', conflicts_with = "build_lib")]
        inplace: bool,

        /// Number of extensions built concurrently
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// CMake executable
        #[arg(long, value_name = "PATH")]
        cmake: Option<PathBuf>,

        /// Python interpreter passed to CMake
        #[arg(long, value_name = "PATH")]
        python: Option<PathBuf>,
    },

    /// Check that the selected backends can be built
    Doctor {
        /// CMake executable
        #[arg(long, value_name = "PATH")]
        cmake: Option<PathBuf>,

        /// Python interpreter passed to CMake
        #[arg(long, value_name = "PATH")]
        python: Option<PathBuf>,
    },

    /// Remove temporary build trees of the selected backends
    Clean {
        /// Directory for temporary build trees
        #[arg(long, short = 't', value_name = "DIR")]
        build_temp: Option<PathBuf>,

        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn run() -> anyhow::Result<()> {
    let classified = classify(std::env::args_os())?;

    // Our options first; clap prints its own help and exits afterwards
    if classified.help_requested {
        println!("{}", usage());
    }

    let cli = Cli::parse_from(&classified.remainder);
    pysnark_build::init_debug(cli.debug);
    pysnark_build::debug!(
        "forwarded {:?}, flags {:?}, qaptools-bin {:?}",
        classified.forwarded,
        classified.flags,
        classified.qaptools_bin
    );

    let config = Config::load_with_options(cli.config.as_deref())?;
    let invocation = Invocation::new(classified, config, cli.quiet);

    match cli.command {
        Commands::Manifest { format } => commands::manifest::run(&invocation, format),
        Commands::BuildExt {
            build_lib,
            build_temp,
            inplace,
            jobs,
            cmake,
            python,
        } => {
            let options = BuildExtOptions {
                build_lib,
                build_temp,
                inplace,
                jobs,
                cmake,
                python,
            };
            commands::build_ext::run(&invocation, &options)
        }
        Commands::Doctor { cmake, python } => commands::doctor::run(&invocation, cmake, python),
        Commands::Clean {
            build_temp,
            dry_run,
        } => commands::clean::run(&invocation, build_temp.as_deref(), dry_run),
        Commands::Completion { shell } => commands::completion::run(shell),
    }
}

fn main() {
    if let Err(e) = run() {
        display_error(&e);
        process::exit(1);
    }
}

mod commands;
