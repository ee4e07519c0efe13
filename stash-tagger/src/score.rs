//! Per-candidate fingerprint scores
//!
//! Both scores count how many of the candidate's fingerprints match the
//! local scene and what fraction that is. A candidate without the relevant
//! fingerprints scores zero across the board rather than NaN.

use crate::fingerprint::{Candidate, LocalScene};
use crate::phash;
use serde::Serialize;
use stash_common::MatchThresholds;
use std::cmp::Ordering;

/// Phash agreement between a candidate and the local scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhashScore {
    /// Candidate phash fingerprints within the distance threshold
    pub match_count: usize,
    /// `match_count` over the candidate's phash fingerprint count
    pub match_ratio: f64,
}

/// Duration agreement between a candidate and the local scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationScore {
    /// Candidate fingerprint durations within the tolerance
    pub match_count: usize,
    /// `match_count` over the candidate's fingerprint duration count
    pub match_ratio: f64,
    /// Closest any candidate duration came to a local file, in seconds
    pub min_diff_secs: f64,
}

/// Everything the ranker orders candidates by
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreTuple {
    pub has_fingerprints: bool,
    pub phash: PhashScore,
    pub duration: DurationScore,
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Score a candidate's phash fingerprints
///
/// Each candidate phash is compared against every phash of every local file;
/// the closest one decides whether it matches.
pub fn phash_score(local: &LocalScene, candidate: &Candidate, thresholds: &MatchThresholds) -> PhashScore {
    let mut total = 0;
    let mut match_count = 0;

    for fp in candidate.phash_fingerprints() {
        total += 1;
        let best = phash::min_distance(&fp.hash, local.phashes());
        if best.is_some_and(|d| d <= thresholds.phash_distance_threshold) {
            match_count += 1;
        }
    }

    PhashScore {
        match_count,
        match_ratio: ratio(match_count, total),
    }
}

/// Score a candidate's fingerprint durations
///
/// Each candidate duration is compared against the closest local file
/// duration. A local scene without durations matches nothing.
pub fn duration_score(local: &LocalScene, candidate: &Candidate, thresholds: &MatchThresholds) -> DurationScore {
    let local_durations: Vec<f64> = local.file_durations().collect();

    let mut total = 0;
    let mut match_count = 0;
    let mut min_diff: Option<f64> = None;

    for duration in candidate.fingerprint_durations() {
        total += 1;
        let diff = local_durations
            .iter()
            .map(|local| (duration - local).abs())
            .min_by(f64::total_cmp);

        if let Some(diff) = diff {
            if diff <= thresholds.duration_tolerance_secs {
                match_count += 1;
            }
            min_diff = Some(min_diff.map_or(diff, |m| m.min(diff)));
        }
    }

    DurationScore {
        match_count,
        match_ratio: ratio(match_count, total),
        min_diff_secs: min_diff.unwrap_or(0.0),
    }
}

impl ScoreTuple {
    pub fn compute(local: &LocalScene, candidate: &Candidate, thresholds: &MatchThresholds) -> Self {
        Self {
            has_fingerprints: candidate.has_fingerprints(),
            phash: phash_score(local, candidate, thresholds),
            duration: duration_score(local, candidate, thresholds),
        }
    }

    /// Best-first ordering: `Less` means `self` should be shown first
    ///
    /// 1. Candidates with no fingerprints at all go last
    /// 2. More phash matches
    /// 3. Higher phash match ratio
    /// 4. More duration matches
    /// 5. Higher duration match ratio
    /// 6. Smaller minimum duration difference
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .has_fingerprints
            .cmp(&self.has_fingerprints)
            .then_with(|| other.phash.match_count.cmp(&self.phash.match_count))
            .then_with(|| other.phash.match_ratio.total_cmp(&self.phash.match_ratio))
            .then_with(|| other.duration.match_count.cmp(&self.duration.match_count))
            .then_with(|| other.duration.match_ratio.total_cmp(&self.duration.match_ratio))
            .then_with(|| self.duration.min_diff_secs.total_cmp(&other.duration.min_diff_secs))
    }
}
