//! Character-level string similarity shared by every fuzzy stage.

use strsim::levenshtein;

/// Normalized edit-distance similarity in [0, 1].
///
/// `(max_len - distance) / max_len`, counted in characters. Two empty
/// strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Index and score of the most similar candidate. Ties keep the earliest.
pub fn best_match<'c, I>(query: &str, candidates: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'c str>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        let score = similarity(query, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best
}
