//! CLI parse: clap types for phototag. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// phototag - tag photos by renaming them
#[derive(Parser)]
#[command(name = "phototag")]
#[command(about = "Tag image files by encoding tags in their file names")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides layered config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the root, pick up new images, and save the catalog
    Scan,
    /// List tracked images with their tags
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Only images carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show catalog summary and missing files
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Add or remove tags on an image
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Rename an image back to a name from its history
    Revert {
        /// Image id (#3), relative path, or file name
        image: String,
        /// A previous name of the image
        name: String,
    },
    /// Show the name history of an image
    History {
        /// Image id (#3), relative path, or file name
        image: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List every name an image has carried
    Names {
        /// Image id (#3), relative path, or file name
        image: String,
    },
    /// Manage the set of known tags
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },
    /// Show recent tag and rename activity
    Activity {
        /// Number of lines to show
        #[arg(long, default_value = "20")]
        lines: usize,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
pub enum TagCommands {
    /// Add tags to an image, one rename per tag
    Add {
        /// Image id (#3), relative path, or file name
        image: String,
        /// Tags to add; a leading '@' is optional
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from an image, one rename per tag
    Remove {
        /// Image id (#3), relative path, or file name
        image: String,
        /// Tags to remove; a leading '@' is optional
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum RegistryCommands {
    /// Register tags for reuse
    Add {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Forget tags; images that carry them are unchanged
    Remove {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// List registered tags
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
