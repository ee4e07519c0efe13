//! Command line arguments

use clap::{Parser, Subcommand};
use stash_bulk::EntityKind;
use stash_common::ParseMode;
use std::path::PathBuf;

/// Bulk edit aggregation and tagger candidate ranking over JSON files
#[derive(Parser, Debug)]
#[clap(name = "stash-cli")]
#[clap(version)]
pub struct Args {
    /// Config file (default: $STASH_TAGGER_CONFIG, then the platform config dir)
    #[clap(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank remote candidates for a local scene
    ///
    /// Input: {"scene": {...}, "candidates": [...]}
    Rank {
        /// Input file, `-` for stdin
        #[clap(long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Show which fields a selection of entities agrees on
    Aggregate {
        /// Entity kind; selects the bulk-editable fields
        #[clap(long)]
        kind: EntityKind,

        /// JSON array of entities, `-` for stdin
        #[clap(long, value_name = "FILE")]
        input: PathBuf,

        /// Aggregate these (dotted) fields instead of the kind's defaults
        #[clap(long = "field", value_name = "FIELD")]
        fields: Vec<String>,
    },

    /// Resolve a bulk edit into an update payload
    ///
    /// Input: {"kind": "...", "entities": [...], "fields": {...}, "relations": {...}}
    BulkUpdate {
        #[clap(long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Prepare the default search query for a local scene
    Query {
        /// Scene JSON, `-` for stdin
        #[clap(long, value_name = "FILE")]
        input: PathBuf,

        /// Override the configured parse mode
        #[clap(long)]
        mode: Option<ParseMode>,
    },

    /// Manage the config file
    Config {
        #[clap(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,
}
