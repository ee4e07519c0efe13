//! stash-cli - bulk edit aggregation and tagger candidate ranking
//!
//! **Usage:**
//! ```bash
//! stash-cli rank --input scene.json
//! stash-cli aggregate --kind scene --input selection.json [--field rating100]
//! stash-cli bulk-update --input edit.json
//! stash-cli query --input scene.json [--mode filename]
//! stash-cli config init|show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use stash_bulk::Entity;
use stash_cli::commands::{self, BulkUpdateRequest, RankRequest};
use stash_cli::{Args, Command, ConfigAction};
use stash_common::config::target_config_path;
use stash_common::logging::init_tracing;
use stash_common::TomlConfig;
use stash_tagger::{Blacklist, LocalScene};
use tracing::{debug, info};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // `config init` must work before any config file exists
    let (config, source) = match &args.command {
        Command::Config {
            action: ConfigAction::Init { .. },
        } => (TomlConfig::default(), None),
        _ => TomlConfig::load_or_default(args.config.as_deref())?,
    };
    init_tracing(&config.logging, args.verbose)?;

    match &source {
        Some(path) => debug!("Using config file {}", path.display()),
        None => debug!("Using built-in configuration"),
    }

    match args.command {
        Command::Rank { input } => {
            let request: RankRequest = commands::read_json(&input)?;
            let ranked = commands::rank_command(&request, &config.matching);
            print_json(&ranked)?;
        }

        Command::Aggregate { kind, input, fields } => {
            let entities: Vec<Entity> = commands::read_json(&input)?;
            let result = commands::aggregate_command(kind, &entities, &fields);
            print_json(&result)?;
        }

        Command::BulkUpdate { input } => {
            let request: BulkUpdateRequest = commands::read_json(&input)?;
            let payload = commands::bulk_update_command(request)?;
            print_json(&payload)?;
        }

        Command::Query { input, mode } => {
            let scene: LocalScene = commands::read_json(&input)?;
            let blacklist = Blacklist::new(&config.tagger.blacklist);
            let mode = mode.unwrap_or(config.tagger.mode);
            println!("{}", commands::query_command(&scene, mode, &blacklist));
        }

        Command::Config { action } => match action {
            ConfigAction::Init { force } => {
                let path = target_config_path(args.config.as_deref())
                    .context("No config directory on this platform; pass --config")?;
                commands::init_config(&path, force)?;
                info!("Config written to {}", path.display());
            }
            ConfigAction::Show => {
                print!("{}", commands::show_config(&config)?);
            }
        },
    }

    Ok(())
}
