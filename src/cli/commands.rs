//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagger")]
#[command(about = "Manage tags of files and directories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Traversal limits shared by `find` and `clear`
#[derive(Args, Debug, Clone, Copy)]
pub struct WalkArgs {
    /// Only the shallowest tagged entry of each branch
    #[arg(long)]
    pub top_only: bool,

    /// Directory layers to search below PATH
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add tags to a file or directory
    Add {
        /// Path to add tags to
        path: PathBuf,

        /// Tags to add
        tags: Vec<String>,
    },

    /// Remove tags from a file or directory
    Rm {
        /// Path to remove tags from
        path: PathBuf,

        /// Tags to remove
        tags: Vec<String>,
    },

    /// Print the tags of a file or directory
    Get {
        /// Path of tags
        path: PathBuf,
    },

    /// Find entries holding all given tags
    Find {
        /// Directory to search, or a single file to check
        path: PathBuf,

        /// Tags to find
        tags: Vec<String>,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Clear the tags of a file or directory
    Clear {
        /// Path to clear tags from
        path: PathBuf,

        /// Clear tagged entries beneath PATH too
        #[arg(short, long)]
        recursive: bool,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Copy entries holding all given tags into one directory
    Merge {
        /// Directory to search
        path: PathBuf,

        /// Destination directory (created if missing)
        dest: PathBuf,

        /// Tags to merge by
        tags: Vec<String>,
    },

    /// Drop tag records of paths that no longer exist
    Sync {
        /// Directory whose record is synced
        path: PathBuf,

        /// Sync every record beneath PATH
        #[arg(short, long)]
        recursive: bool,
    },
}
