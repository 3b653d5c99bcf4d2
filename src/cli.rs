//! Command-line definitions
//!
//! Kept out of `main.rs` so the argument surface can be unit tested.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Debug, Parser)]
#[command(name = "commit-index")]
#[command(about = "Import a pre-formatted commit log export into a searchable index")]
#[command(
    long_about = "Import a pre-formatted commit log export into a searchable index.

The export is a text file of `Field: value` lines. Each `Revision:` line starts a
new commit; Author, Date, Message and Added/Modified/Deleted lines fill it in.
Messages must be on a single line. Merge commits are skipped.

EXAMPLES:
    commit-index history.log                 Import into the default collection
    commit-index -y --collection repo2 x.log Import without the confirmation prompt
    commit-index --dry-run history.log       Parse and count, write nothing
    commit-index search \"SI-42\"              Search imported commits
    commit-index stats                       Count imported commits"
)]
#[command(version, long_version = LONG_VERSION)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Commit log export to import
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file (defaults to the platform config dir)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the index collections
    #[arg(long, global = true, value_name = "DIR")]
    pub index_path: Option<PathBuf>,

    /// Collection to import into or query
    #[arg(long, global = true, value_name = "NAME")]
    pub collection: Option<String>,

    /// Skip the sanitation confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Parse and count without writing to the index
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Full-text search over imported commits
    Search {
        /// Query string (words, `field:value`, ticket ids)
        query: String,

        /// Maximum number of hits to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Print the number of commits in the collection
    Stats,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.index_path {
            config.store.index_path = path.clone();
        }
        if let Some(collection) = &self.collection {
            config.store.collection = collection.clone();
        }
    }
}
