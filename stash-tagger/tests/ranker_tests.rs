//! Integration tests for candidate ranking

use serde_json::json;
use stash_tagger::{
    duration_score, phash_score, rank, Candidate, FingerprintAlgorithm, LocalScene,
    MatchThresholds, RankedCandidate, RemoteFingerprint,
};

const LOCAL_PHASH: &str = "a5a5a5a5a5a5a5a5";

fn local_scene() -> LocalScene {
    serde_json::from_value(json!({
        "id": "42",
        "phash": LOCAL_PHASH,
        "files": [{"duration": 120.0, "fingerprints": [{"type": "phash", "value": LOCAL_PHASH}]}],
    }))
    .unwrap()
}

/// `LOCAL_PHASH` with the lowest `bits` bits flipped
fn phash_at_distance(bits: u32) -> String {
    let base = u64::from_str_radix(LOCAL_PHASH, 16).unwrap();
    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    format!("{:016x}", base ^ mask)
}

fn fingerprint(algorithm: FingerprintAlgorithm, hash: &str, duration: Option<f64>) -> RemoteFingerprint {
    RemoteFingerprint {
        algorithm,
        hash: hash.to_string(),
        duration,
    }
}

fn candidate(title: &str, fingerprints: Vec<RemoteFingerprint>) -> Candidate {
    let mut c = Candidate {
        fingerprints,
        ..Default::default()
    };
    c.extra.insert("title".to_string(), json!(title));
    c
}

fn titles(ranked: &[RankedCandidate]) -> Vec<&str> {
    ranked
        .iter()
        .map(|r| r.candidate.extra["title"].as_str().unwrap())
        .collect()
}

#[test]
fn test_close_phash_beats_no_fingerprints() {
    let a = candidate(
        "A",
        vec![fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(3), Some(119.0))],
    );
    let b = candidate("B", vec![]);

    let ranked = rank(&local_scene(), &[b, a], &MatchThresholds::default());
    assert_eq!(titles(&ranked), vec!["A", "B"]);
    assert!(ranked[0].badges.duration_match);
    assert!(!ranked[0].badges.hash_match);
}

#[test]
fn test_fingerprintless_candidates_always_last() {
    let thresholds = MatchThresholds::default();
    let local = local_scene();

    // Even a candidate whose only fingerprint matches nothing beats an empty one
    let weak = candidate("weak", vec![fingerprint(FingerprintAlgorithm::Md5, "zz", None)]);
    let empty_with_duration = {
        let mut c = candidate("empty", vec![]);
        c.duration = Some(120.0);
        c
    };

    for input in [
        vec![empty_with_duration.clone(), weak.clone()],
        vec![weak.clone(), empty_with_duration.clone()],
    ] {
        let ranked = rank(&local, &input, &thresholds);
        assert_eq!(titles(&ranked), vec!["weak", "empty"]);
    }
}

#[test]
fn test_match_count_before_ratio() {
    let thresholds = MatchThresholds::default();
    let a = candidate(
        "A",
        vec![
            fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(1), None),
            fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(2), None),
            fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(40), None),
        ],
    );
    let b = candidate(
        "B",
        vec![fingerprint(FingerprintAlgorithm::Phash, LOCAL_PHASH, None)],
    );

    let local = local_scene();
    assert_eq!(phash_score(&local, &a, &thresholds).match_count, 2);
    assert_eq!(phash_score(&local, &b, &thresholds).match_ratio, 1.0);

    let ranked = rank(&local, &[b, a], &thresholds);
    assert_eq!(titles(&ranked), vec!["A", "B"]);
}

#[test]
fn test_ratio_breaks_count_tie() {
    let thresholds = MatchThresholds::default();
    let a = candidate(
        "A",
        vec![
            fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(1), None),
            fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(40), None),
        ],
    );
    let b = candidate(
        "B",
        vec![fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(5), None)],
    );

    let ranked = rank(&local_scene(), &[a, b], &thresholds);
    assert_eq!(titles(&ranked), vec!["B", "A"]);
}

#[test]
fn test_duration_breaks_phash_tie() {
    let thresholds = MatchThresholds::default();
    let near = candidate(
        "near",
        vec![fingerprint(FingerprintAlgorithm::Oshash, "x", Some(121.0))],
    );
    let nearer = candidate(
        "nearer",
        vec![fingerprint(FingerprintAlgorithm::Oshash, "y", Some(120.5))],
    );
    let far = candidate(
        "far",
        vec![fingerprint(FingerprintAlgorithm::Oshash, "z", Some(200.0))],
    );

    let ranked = rank(&local_scene(), &[far, near, nearer], &thresholds);
    assert_eq!(titles(&ranked), vec!["nearer", "near", "far"]);
}

#[test]
fn test_identical_scores_keep_input_order() {
    let thresholds = MatchThresholds::default();
    let input: Vec<Candidate> = ["first", "second", "third", "fourth"]
        .iter()
        .map(|t| {
            candidate(
                t,
                vec![fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(2), Some(118.0))],
            )
        })
        .collect();

    let ranked = rank(&local_scene(), &input, &thresholds);
    assert_eq!(titles(&ranked), vec!["first", "second", "third", "fourth"]);
    assert_eq!(
        ranked.iter().map(|r| r.input_index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn test_scores_never_nan() {
    let thresholds = MatchThresholds::default();
    let empty_local = LocalScene::default();
    let candidates = [
        candidate("none", vec![]),
        candidate("bad", vec![fingerprint(FingerprintAlgorithm::Phash, "not-hex", Some(f64::NAN))]),
        candidate("md5", vec![fingerprint(FingerprintAlgorithm::Md5, "m", None)]),
    ];

    for local in [local_scene(), empty_local] {
        for c in &candidates {
            let p = phash_score(&local, c, &thresholds);
            let d = duration_score(&local, c, &thresholds);
            assert!(!p.match_ratio.is_nan());
            assert!(!d.match_ratio.is_nan());
            assert!(!d.min_diff_secs.is_nan());
        }
        assert_eq!(rank(&local, &candidates, &thresholds).len(), candidates.len());
    }
}

#[test]
fn test_badges_do_not_affect_order() {
    let thresholds = MatchThresholds::default();
    // Exact hash match but far duration, against a closer phash
    let exact_oshash = candidate(
        "exact",
        vec![fingerprint(FingerprintAlgorithm::Md5, "unrelated", Some(500.0))],
    );
    let phash = candidate(
        "phash",
        vec![fingerprint(FingerprintAlgorithm::Phash, &phash_at_distance(4), None)],
    );

    let mut local = local_scene();
    local.oshash = Some("unrelated".to_string());

    let ranked = rank(&local, &[exact_oshash, phash], &thresholds);
    assert_eq!(titles(&ranked), vec!["phash", "exact"]);
    assert!(ranked[1].badges.hash_match);
}
