//! # Stash Common Library
//!
//! Shared code for the stash tagger workspace including:
//! - Error and result types
//! - TOML configuration (match thresholds, tagger settings, logging)
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use config::{LoggingConfig, MatchThresholds, ParseMode, TaggerConfig, TomlConfig};
pub use error::{Error, Result};
