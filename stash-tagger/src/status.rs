//! Match badges and detail shown next to each candidate
//!
//! Informational only; see [`crate::ranker`] for ordering.

use crate::fingerprint::{Candidate, LocalScene};
use crate::phash;
use serde::Serialize;
use stash_common::MatchThresholds;

/// High-confidence indicators for one candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchBadges {
    /// Some candidate hash equals a local checksum, oshash or phash exactly
    pub hash_match: bool,
    /// Nominal or fingerprint duration agrees with the local scene
    pub duration_match: bool,
}

/// A candidate phash close to one of the local phashes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhashMatch {
    pub hash: String,
    pub distance: u32,
}

impl PhashMatch {
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

/// Share of fingerprint durations that matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    /// More than 65%
    High,
    /// More than 35%
    Medium,
    Low,
}

impl MatchLevel {
    pub fn from_ratio(matched: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64 * 100.0
        };

        if percentage > 65.0 {
            MatchLevel::High
        } else if percentage > 35.0 {
            MatchLevel::Medium
        } else {
            MatchLevel::Low
        }
    }
}

/// Duration line shown for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DurationStatus {
    /// Nothing to compare: no local duration, or no candidate durations
    Unknown,
    /// Some fingerprint durations matched
    FingerprintMatches {
        matched: usize,
        total: usize,
        level: MatchLevel,
    },
    /// No fingerprint matched but the nominal duration did
    NominalMatch,
    /// Closest duration is this many whole seconds away
    Off { seconds: u64 },
}

/// Exact-hash and duration badges
pub fn match_badges(local: &LocalScene, candidate: &Candidate, thresholds: &MatchThresholds) -> MatchBadges {
    let local_hashes = local.exact_hashes();
    let hash_match = candidate
        .fingerprints
        .iter()
        .any(|fp| local_hashes.contains(fp.hash.as_str()));

    let duration_match = local.duration().is_some_and(|local_duration| {
        let tolerance = thresholds.duration_tolerance_secs;
        let nominal = candidate
            .nominal_duration()
            .is_some_and(|d| (d - local_duration).abs() < tolerance);
        let fingerprint = candidate
            .fingerprint_durations()
            .any(|d| (d - local_duration).abs() <= tolerance);
        nominal || fingerprint
    });

    MatchBadges {
        hash_match,
        duration_match,
    }
}

/// Candidate phashes within the threshold of some local phash, closest first
///
/// Each hash appears once, with its best distance.
pub fn phash_matches(local: &LocalScene, candidate: &Candidate, thresholds: &MatchThresholds) -> Vec<PhashMatch> {
    let mut matches: Vec<PhashMatch> = Vec::new();

    for fp in candidate.phash_fingerprints() {
        let Some(distance) = phash::min_distance(&fp.hash, local.phashes()) else {
            continue;
        };
        if distance > thresholds.phash_distance_threshold {
            continue;
        }

        match matches.iter_mut().find(|m| m.hash == fp.hash) {
            Some(existing) => existing.distance = existing.distance.min(distance),
            None => matches.push(PhashMatch {
                hash: fp.hash.clone(),
                distance,
            }),
        }
    }

    matches.sort_by_key(|m| m.distance);
    matches
}

/// Summarise how the candidate's durations compare to `local_duration`
pub fn duration_status(
    candidate: &Candidate,
    local_duration: Option<f64>,
    thresholds: &MatchThresholds,
) -> DurationStatus {
    let Some(local_duration) = local_duration.filter(|d| d.is_finite() && *d > 0.0) else {
        return DurationStatus::Unknown;
    };

    let diffs: Vec<f64> = candidate
        .fingerprint_durations()
        .map(|d| (d - local_duration).abs())
        .collect();
    let nominal_diff = candidate
        .nominal_duration()
        .map(|d| (d - local_duration).abs());

    if nominal_diff.is_none() && diffs.is_empty() {
        return DurationStatus::Unknown;
    }

    let tolerance = thresholds.duration_tolerance_secs;
    let matched = diffs.iter().filter(|d| **d <= tolerance).count();
    if matched > 0 {
        return DurationStatus::FingerprintMatches {
            matched,
            total: diffs.len(),
            level: MatchLevel::from_ratio(matched, diffs.len()),
        };
    }

    if nominal_diff.is_some_and(|d| d < tolerance) {
        return DurationStatus::NominalMatch;
    }

    let min_diff = diffs
        .iter()
        .copied()
        .chain(nominal_diff)
        .min_by(f64::total_cmp)
        .unwrap_or(0.0);

    DurationStatus::Off {
        seconds: min_diff.floor() as u64,
    }
}
