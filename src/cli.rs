use clap::{Parser, Subcommand};
use std::path::PathBuf;

use marquee::types::MediaType;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Genre top-ten lists for movies and TV series")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and display the top lists for a genre
    Show {
        /// Genre label (see `marquee genres`)
        #[arg(required = true)]
        genre: String,

        /// Limit output to one media type
        #[arg(long, value_enum)]
        media: Option<MediaType>,

        /// Ignore the cached snapshot and refetch
        #[arg(long)]
        refresh: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Entries per list (defaults to the configured max_items)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List configured genres and their per-source keys
    Genres,

    /// List configured sources and their availability
    Sources,

    /// Inspect or drop the snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show the cached snapshot's age and contents summary
    Status,

    /// Delete the cached snapshot
    Clear,
}
