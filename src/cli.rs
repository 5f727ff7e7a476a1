use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weft - incremental compilation driver for Twirl-style templates
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile templates that changed since the last build
    Compile {
        /// Directory containing template sources
        #[arg(short, long, default_value = "app")]
        source_dir: PathBuf,

        /// Directory generated sources are written under
        #[arg(short, long, default_value = "target/templates")]
        output_dir: PathBuf,

        /// Toolchain classpath entries (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        classpath: Vec<PathBuf>,

        /// Build snapshot location
        #[arg(long, default_value = weft::tracker::DEFAULT_STATE_PATH)]
        state: PathBuf,

        /// Ignore the build snapshot and recompile everything
        #[arg(long)]
        full: bool,

        /// Request an isolated compiler process
        #[arg(long)]
        fork: bool,

        /// Show what would be done without compiling or deleting
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the change set without touching anything
    Status {
        /// Directory containing template sources
        #[arg(short, long, default_value = "app")]
        source_dir: PathBuf,

        /// Toolchain classpath entries (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        classpath: Vec<PathBuf>,

        /// Build snapshot location
        #[arg(long, default_value = weft::tracker::DEFAULT_STATE_PATH)]
        state: PathBuf,
    },

    /// Delete all tracked outputs and the build snapshot
    Clean {
        /// Directory generated sources are written under
        #[arg(short, long, default_value = "target/templates")]
        output_dir: PathBuf,

        /// Build snapshot location
        #[arg(long, default_value = weft::tracker::DEFAULT_STATE_PATH)]
        state: PathBuf,

        /// Show what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}
