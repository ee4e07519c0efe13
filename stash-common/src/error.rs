//! Common error types for the stash tagger workspace
//!
//! The reducer and ranker are total functions and never produce these; they
//! only surface when reading or writing the config file.

use thiserror::Error;

/// Common result type for stash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the stash crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML configuration could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML configuration could not be serialized
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
