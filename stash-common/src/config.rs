//! Configuration loading and config file resolution
//!
//! All settings live in a single TOML file with three tables:
//!
//! ```toml
//! [matching]
//! phash_distance_threshold = 8
//! duration_tolerance_secs = 5.0
//!
//! [tagger]
//! mode = "auto"
//! blacklist = ["1080p", "720p"]
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a built-in default, so an empty (or absent) file is valid.
//! The loaded config is handed to the ranker and query builder as a plain
//! value; nothing here is global.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STASH_TAGGER_CONFIG";

/// Maximum Hamming distance (bits) at which two perceptual hashes are similar
pub const DEFAULT_PHASH_DISTANCE: u32 = 8;

/// Maximum duration difference (seconds) at which two durations match
pub const DEFAULT_DURATION_TOLERANCE_SECS: f64 = 5.0;

/// Perceptual hashes are 64 bits wide, so no distance can exceed this
pub const PHASH_BITS: u32 = 64;

/// Filename fragments stripped from search queries by default
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "\\sXXX\\s",
    "1080p",
    "720p",
    "2160p",
    "KTR",
    "RARBG",
    "\\scom\\s",
    "\\[",
    "\\]",
];

/// Root of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Fingerprint match thresholds
    #[serde(default)]
    pub matching: MatchThresholds,

    /// Search query preparation
    #[serde(default)]
    pub tagger: TaggerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thresholds used by the candidate ranker and match badges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Maximum Hamming distance counted as a phash match
    #[serde(default = "default_phash_distance")]
    pub phash_distance_threshold: u32,

    /// Maximum duration difference counted as a duration match
    #[serde(default = "default_duration_tolerance")]
    pub duration_tolerance_secs: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            phash_distance_threshold: DEFAULT_PHASH_DISTANCE,
            duration_tolerance_secs: DEFAULT_DURATION_TOLERANCE_SECS,
        }
    }
}

impl MatchThresholds {
    /// Reject thresholds that would make scoring meaningless
    pub fn validate(&self) -> Result<()> {
        if self.phash_distance_threshold > PHASH_BITS {
            return Err(Error::Config(format!(
                "phash_distance_threshold {} exceeds {} bits",
                self.phash_distance_threshold, PHASH_BITS
            )));
        }
        if !self.duration_tolerance_secs.is_finite() || self.duration_tolerance_secs < 0.0 {
            return Err(Error::Config(format!(
                "duration_tolerance_secs must be a non-negative number, got {}",
                self.duration_tolerance_secs
            )));
        }
        Ok(())
    }
}

/// Where the tagger takes its search query from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Metadata if the scene has a date and studio, otherwise the filename
    #[default]
    Auto,
    /// Scene metadata only
    Metadata,
    /// Filename only
    Filename,
    /// Parent directory of the file
    Dir,
    /// Entire file path
    Path,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Auto => "auto",
            ParseMode::Metadata => "metadata",
            ParseMode::Filename => "filename",
            ParseMode::Dir => "dir",
            ParseMode::Path => "path",
        }
    }
}

impl std::str::FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [
            ParseMode::Auto,
            ParseMode::Metadata,
            ParseMode::Filename,
            ParseMode::Dir,
            ParseMode::Path,
        ]
        .into_iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown parse mode: {}", s))
    }
}

/// Tagger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggerConfig {
    #[serde(default)]
    pub mode: ParseMode,

    /// Regex patterns removed from search queries
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            blacklist: default_blacklist(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_phash_distance() -> u32 {
    DEFAULT_PHASH_DISTANCE
}

fn default_duration_tolerance() -> f64 {
    DEFAULT_DURATION_TOLERANCE_SECS
}

fn default_blacklist() -> Vec<String> {
    DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Render as TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Resolve and load the effective configuration
    ///
    /// Priority order:
    /// 1. Command-line argument (must exist)
    /// 2. `STASH_TAGGER_CONFIG` environment variable (must exist)
    /// 3. Platform config file, if present
    /// 4. Built-in defaults
    ///
    /// Returns the config together with the file it came from, if any.
    pub fn load_or_default(cli_arg: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match resolve_config_path(cli_arg) {
            Some(path) => {
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            None => {
                debug!("No config file found, using built-in defaults");
                Ok((Self::default(), None))
            }
        }
    }
}

/// Resolve which config file to read, if any
///
/// Explicit paths (CLI, environment) are returned even when missing so the
/// caller reports the error; the platform default is only returned if it exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Where `config init` should write: like [`resolve_config_path`], but the
/// platform default is returned whether or not it exists yet
pub fn target_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path(cli_arg).or_else(default_config_path)
}

/// Platform config file location: `<config_dir>/stash-tagger/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stash-tagger").join("config.toml"))
}

/// Write a config file atomically (temp file + rename)
///
/// On Unix the file is restricted to the owner (0600) before it is moved
/// into place.
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = config.to_toml_string()?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(target);
    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    info!("Wrote configuration to {:?}", target);
    Ok(())
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "config.toml".into());
    name.push(".tmp");
    target.with_file_name(name)
}
