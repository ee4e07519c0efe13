//! Local scene and remote candidate model
//!
//! Shapes follow the JSON the API layer hands over: local fingerprints are
//! `{type, value}` with lowercase types, remote ones `{algorithm, hash,
//! duration}` with uppercase algorithms. Unknown fingerprint kinds are kept
//! but never match anything.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Fingerprint type of a local file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintType {
    Md5,
    Oshash,
    Phash,
    #[serde(other)]
    Other,
}

/// Fingerprint algorithm of a remote candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FingerprintAlgorithm {
    Md5,
    Oshash,
    Phash,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFingerprint {
    #[serde(rename = "type")]
    pub kind: FingerprintType,
    pub value: String,
}

/// One file backing a local scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub fingerprints: Vec<LocalFingerprint>,
}

/// Name-only reference (studio, performer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Local scene being tagged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalScene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub files: Vec<LocalFile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oshash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<NamedRef>,

    #[serde(default)]
    pub performers: Vec<NamedRef>,
}

impl LocalScene {
    /// Every perceptual hash of the scene: the summary value and each file's
    pub fn phashes(&self) -> impl Iterator<Item = &str> {
        self.phash.as_deref().into_iter().chain(
            self.files
                .iter()
                .flat_map(|f| f.fingerprints.iter())
                .filter(|fp| fp.kind == FingerprintType::Phash)
                .map(|fp| fp.value.as_str()),
        )
    }

    /// Every exact hash (checksum, oshash, phash) of the scene
    pub fn exact_hashes(&self) -> HashSet<&str> {
        [&self.checksum, &self.oshash, &self.phash]
            .into_iter()
            .filter_map(|h| h.as_deref())
            .chain(
                self.files
                    .iter()
                    .flat_map(|f| f.fingerprints.iter())
                    .filter(|fp| fp.kind != FingerprintType::Other)
                    .map(|fp| fp.value.as_str()),
            )
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// Known file durations; zero means the length was never read
    pub fn file_durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.files
            .iter()
            .map(|f| f.duration)
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Duration shown for the scene: the primary file's, if it has one
    pub fn duration(&self) -> Option<f64> {
        self.files
            .first()
            .map(|f| f.duration)
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Path of the primary file
    pub fn path(&self) -> Option<&str> {
        self.files.first().and_then(|f| f.path.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFingerprint {
    pub algorithm: FingerprintAlgorithm,
    pub hash: String,

    /// Duration in seconds of the file this fingerprint was submitted for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Candidate scene returned by a remote source
///
/// Fields other than fingerprints and duration pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub fingerprints: Vec<RemoteFingerprint>,

    /// Nominal scene duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Candidate {
    pub fn has_fingerprints(&self) -> bool {
        !self.fingerprints.is_empty()
    }

    pub fn phash_fingerprints(&self) -> impl Iterator<Item = &RemoteFingerprint> {
        self.fingerprints
            .iter()
            .filter(|fp| fp.algorithm == FingerprintAlgorithm::Phash)
    }

    /// Usable fingerprint durations
    pub fn fingerprint_durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.fingerprints
            .iter()
            .filter_map(|fp| fp.duration)
            .filter(|d| d.is_finite())
    }

    /// Nominal duration, ignoring zero and non-finite values
    pub fn nominal_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }
}
