//! Perceptual hash distance
//!
//! Phashes travel as hex strings of a 64-bit value. Leading zeros may be
//! dropped by the backend, so strings are compared numerically.

/// Parse a hex-encoded 64-bit phash
pub fn parse(hash: &str) -> Option<u64> {
    let hash = hash.trim();
    if hash.is_empty() || hash.len() > 16 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(hash, 16).ok()
}

/// Hamming distance between two hex phashes
///
/// `None` if either side is not a valid phash; such pairs never match.
pub fn distance(a: &str, b: &str) -> Option<u32> {
    Some((parse(a)? ^ parse(b)?).count_ones())
}

/// Smallest distance from `hash` to any of `others`
pub fn min_distance<'a, I>(hash: &str, others: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    let hash = parse(hash)?;
    others
        .into_iter()
        .filter_map(parse)
        .map(|other| (hash ^ other).count_ones())
        .min()
}
