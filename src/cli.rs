use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "surf",
    about = "Disk scan and cleanup — junk categories, duplicates, large files",
    version
)]
pub struct Cli {
    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank the largest files and file types under a directory
    Scan {
        /// Directory to scan
        path: String,

        /// How many files to keep in the ranked tables
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Ignore files smaller than this (e.g. "10MB")
        #[arg(long, default_value = "0")]
        min_size: String,
    },

    /// Scan the configured junk locations (dry-run, no deletion)
    Junk,

    /// Delete junk categories (requires --confirm to actually delete)
    Clean {
        /// Category ids to clean; defaults to every category that is
        /// selected by default (trash is not)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Actually delete files. Without this flag, shows a preview.
        #[arg(long)]
        confirm: bool,
    },

    /// Find duplicate files by size and content hash
    Duplicates {
        /// Directory to scan
        path: String,

        /// Skip files smaller than this (e.g. "1MB")
        #[arg(long, default_value = "1MB")]
        min_size: String,
    },

    /// Show disk usage for the volume holding a path
    Disk {
        #[arg(default_value = "/")]
        path: String,
    },
}
