//! Command-line interface definitions.

use almanac::config::CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Derived-page pipeline for blogs
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Content directory (relative to project root)
    #[arg(short, long, default_value = "content")]
    pub content: PathBuf,

    /// Config file name (relative to project root)
    #[arg(short = 'C', long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild and emit the resource manifest as JSON
    Build {
        /// Write the manifest to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the manifest
        #[arg(long)]
        pretty: bool,
    },

    /// Validate configuration and sources without emitting anything
    Check,

    /// Create a new article from the `sources` template
    New {
        /// Article title
        title: String,

        /// Article date (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or RFC 3339); defaults to now
        #[arg(short, long)]
        date: Option<String>,

        /// Article language
        #[arg(short, long)]
        lang: Option<String>,
    },
}

impl Cli {
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.content)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config)
    }
}
