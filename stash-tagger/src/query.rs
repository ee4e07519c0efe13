//! Default search query for a local scene
//!
//! Built either from scene metadata or from part of the file path, depending
//! on the configured [`ParseMode`]. Blacklist entries are case-insensitive
//! regular expressions.

use crate::fingerprint::LocalScene;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use stash_common::ParseMode;
use tracing::warn;

/// `.yy.mm.dd.` as found in release-style filenames
static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(\d\d)\.(\d\d)\.(\d\d)\.").unwrap());

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 ]+").unwrap());

/// Compiled blacklist patterns
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Regex>,
}

impl Blacklist {
    /// Compile `patterns`, skipping any that are not valid regexes
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| {
                let p = p.as_ref();
                match RegexBuilder::new(p).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(pattern = p, error = %e, "Skipping invalid blacklist pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Remove every match of every pattern, in order
    pub fn strip_all(&self, s: &str) -> String {
        self.patterns
            .iter()
            .fold(s.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }

    /// Remove the first match of each pattern, in order
    pub fn strip_first(&self, s: &str) -> String {
        self.patterns
            .iter()
            .fold(s.to_string(), |acc, re| re.replace(&acc, "").into_owned())
    }
}

fn use_metadata(scene: &LocalScene, mode: ParseMode) -> bool {
    match mode {
        ParseMode::Metadata => true,
        ParseMode::Auto => scene.date.is_some() && scene.studio.is_some(),
        _ => false,
    }
}

fn metadata_query(scene: &LocalScene, blacklist: &Blacklist) -> String {
    let performers = scene
        .performers
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let title = scene
        .title
        .as_deref()
        .map(|t| NON_ALPHANUMERIC.replace_all(t, "").into_owned())
        .unwrap_or_default();

    let parts = [
        scene.date.clone().unwrap_or_default(),
        scene.studio.as_ref().map(|s| s.name.clone()).unwrap_or_default(),
        performers,
        title,
    ];
    let joined = parts
        .iter()
        .filter(|s| !s.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    blacklist.strip_all(&joined)
}

fn path_source(path: &str, mode: ParseMode) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match mode {
        ParseMode::Path => segments.join(" "),
        ParseMode::Dir => segments
            .len()
            .checked_sub(2)
            .and_then(|i| segments.get(i))
            .copied()
            .unwrap_or_default()
            .to_string(),
        _ => segments.last().copied().unwrap_or_default().to_string(),
    }
}

fn path_query(path: &str, mode: ParseMode, blacklist: &Blacklist) -> String {
    let stripped = blacklist.strip_first(&path_source(path, mode));

    let date = DATE_REGEX.captures(&stripped).map(|c| {
        (
            c[0].to_string(),
            format!(" 20{}-{}-{} ", &c[1], &c[2], &c[3]),
        )
    });

    let mut s = stripped.replace('-', " ");
    if let Some((found, iso)) = date {
        s = s.replacen(&found, &iso, 1);
    }
    s.replace('.', " ")
}

/// Query string to search remote sources with for `scene`
///
/// Leading and trailing whitespace is trimmed; inner spacing is left alone.
pub fn prepare_query_string(scene: &LocalScene, mode: ParseMode, blacklist: &Blacklist) -> String {
    let query = if use_metadata(scene, mode) {
        metadata_query(scene, blacklist)
    } else {
        path_query(scene.path().unwrap_or_default(), mode, blacklist)
    };
    query.trim().to_string()
}
