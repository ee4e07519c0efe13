//! # Stash Tagger
//!
//! Matching of local scenes against candidates returned by a remote metadata
//! source (stash-box endpoint or scraper).
//!
//! - [`fingerprint`]: local scene and remote candidate model
//! - [`phash`]: perceptual hash parsing and Hamming distance
//! - [`score`]: per-candidate phash and duration scores
//! - [`ranker`]: best-first ordering of candidates
//! - [`status`]: match badges and per-hash/per-duration detail for display
//! - [`query`]: search query preparation from scene metadata or file path
//!
//! Thresholds come from [`stash_common::MatchThresholds`] and are passed in
//! explicitly. Nothing here panics, and no score is ever NaN.

pub mod fingerprint;
pub mod phash;
pub mod query;
pub mod ranker;
pub mod score;
pub mod status;

pub use fingerprint::{
    Candidate, FingerprintAlgorithm, FingerprintType, LocalFile, LocalFingerprint, LocalScene,
    RemoteFingerprint,
};
pub use query::{prepare_query_string, Blacklist};
pub use ranker::{compare, rank, RankedCandidate};
pub use score::{duration_score, phash_score, DurationScore, PhashScore, ScoreTuple};
pub use status::{
    duration_status, match_badges, phash_matches, DurationStatus, MatchBadges, MatchLevel,
    PhashMatch,
};
pub use stash_common::MatchThresholds;
