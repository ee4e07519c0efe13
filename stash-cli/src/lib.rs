//! # Stash CLI
//!
//! Command line front end for the bulk edit reducer and the tagger ranker.
//! Reads JSON input, prints JSON (or plain text for `query`) to stdout, and
//! logs to stderr.

pub mod cli;
pub mod commands;

pub use cli::{Args, Command, ConfigAction};
