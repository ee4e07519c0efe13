//! Best-first ordering of remote candidates
//!
//! The order only uses the numeric scores of [`ScoreTuple`]. The exact-hash
//! and duration badges are computed alongside for display but never feed
//! back into the order.

use crate::fingerprint::{Candidate, LocalScene};
use crate::score::ScoreTuple;
use crate::status::{match_badges, MatchBadges};
use serde::Serialize;
use stash_common::MatchThresholds;
use std::cmp::Ordering;
use tracing::debug;

/// A candidate together with how well it matched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// Position of the candidate in the input list
    pub input_index: usize,
    pub candidate: Candidate,
    pub score: ScoreTuple,
    pub badges: MatchBadges,
}

/// Compare two candidates for the same local scene
///
/// `Less` means `a` should be presented before `b`.
pub fn compare(a: &Candidate, b: &Candidate, local: &LocalScene, thresholds: &MatchThresholds) -> Ordering {
    let score_a = ScoreTuple::compute(local, a, thresholds);
    let score_b = ScoreTuple::compute(local, b, thresholds);
    score_a.rank_cmp(&score_b)
}

/// Sorted copy of `candidates`, best first
///
/// Candidates that tie on every score keep their input order.
pub fn rank(local: &LocalScene, candidates: &[Candidate], thresholds: &MatchThresholds) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(input_index, candidate)| RankedCandidate {
            input_index,
            candidate: candidate.clone(),
            score: ScoreTuple::compute(local, candidate, thresholds),
            badges: match_badges(local, candidate, thresholds),
        })
        .collect();

    // slice::sort_by is stable
    ranked.sort_by(|a, b| a.score.rank_cmp(&b.score));

    debug!(
        scene = local.id.as_deref().unwrap_or("-"),
        candidates = ranked.len(),
        best = ranked.first().map(|r| r.input_index),
        "Ranked candidates"
    );

    ranked
}
