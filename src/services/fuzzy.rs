//! Approximate title matching.
//!
//! Scores are in `0.0..=1.0` and combine three edit-distance views of the
//! processed strings: the plain ratio, a token-sorted ratio (word order
//! insensitive) and a down-weighted partial ratio for short queries against
//! long titles.

use std::cmp::Ordering;
use strsim::normalized_levenshtein;

const PARTIAL_WEIGHT: f64 = 0.9;
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Lowercases, replaces punctuation with spaces and collapses whitespace
pub fn process(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn token_sort(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best ratio of the shorter string against equally long windows of the longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if shorter.is_empty()
        || (longer.len() as f64) < shorter.len() as f64 * PARTIAL_MIN_LENGTH_RATIO
    {
        return 0.0;
    }

    let needle: String = shorter.iter().collect();
    longer
        .windows(shorter.len())
        .map(|window| normalized_levenshtein(&needle, &window.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

/// Scores two already-processed strings
fn score_processed(query: &str, candidate: &str) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let ratio = normalized_levenshtein(query, candidate);
    let sorted = normalized_levenshtein(&token_sort(query), &token_sort(candidate));
    let partial = partial_ratio(query, candidate) * PARTIAL_WEIGHT;

    ratio.max(sorted).max(partial)
}

/// Similarity between a free-text query and a title, in `0.0..=1.0`
pub fn score(query: &str, candidate: &str) -> f64 {
    score_processed(&process(query), &process(candidate))
}

/// Highest-scoring candidate as `(position, score)`; ties go to the earliest position
///
/// Returns `None` when there are no candidates or the query has no
/// alphanumeric content.
pub fn best_match<'a, I>(query: &str, candidates: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = process(query);
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (position, candidate) in candidates.into_iter().enumerate() {
        let candidate_score = score_processed(&query, &process(candidate));
        if best.map_or(true, |(_, best_score)| candidate_score > best_score) {
            best = Some((position, candidate_score));
        }
    }
    best
}

/// Up to `n` candidates with a non-zero score, best first, ties by position
pub fn top_matches<'a, I>(query: &str, candidates: I, n: usize) -> Vec<(usize, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = process(query);
    if query.is_empty() || n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = candidates
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| (position, score_processed(&query, &process(candidate))))
        .filter(|(_, s)| *s > 0.0)
        .collect();

    // Stable sort keeps catalog order among equal scores
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLES: [&str; 5] = [
        "Avatar",
        "Inception",
        "Interstellar",
        "The Dark Knight",
        "The Dark Knight Rises",
    ];

    #[test]
    fn test_process() {
        assert_eq!(process("  Spider-Man: Homecoming "), "spider man homecoming");
        assert_eq!(process("WALL·E"), "wall e");
        assert_eq!(process("!!!"), "");
    }

    #[test]
    fn test_score_identical_is_one() {
        assert_eq!(score("Inception", "inception"), 1.0);
    }

    #[test]
    fn test_score_word_order_insensitive() {
        assert_eq!(score("knight dark the", "The Dark Knight"), 1.0);
    }

    #[test]
    fn test_score_partial_is_down_weighted() {
        let s = score("dark knight", "The Dark Knight Rises");
        assert!((s - PARTIAL_WEIGHT).abs() < 1e-9, "got {}", s);
    }

    #[test]
    fn test_score_empty_inputs() {
        assert_eq!(score("", "Avatar"), 0.0);
        assert_eq!(score("Avatar", "   "), 0.0);
    }

    #[test]
    fn test_best_match_typo() {
        let (position, s) = best_match("inceptoin", TITLES).unwrap();
        assert_eq!(TITLES[position], "Inception");
        assert!(s > 0.7);
    }

    #[test]
    fn test_best_match_tie_goes_to_first() {
        let (position, _) = best_match("alien", ["Alien", "ALIEN", "Aliens"]).unwrap();
        assert_eq!(position, 0);
    }

    #[test]
    fn test_best_match_no_candidates() {
        assert_eq!(best_match("avatar", Vec::<&str>::new()), None);
    }

    #[test]
    fn test_best_match_blank_query() {
        assert_eq!(best_match("  ", TITLES), None);
    }

    #[test]
    fn test_top_matches_ordering_and_limit() {
        let matches = top_matches("the dark knight", TITLES, 2);
        assert_eq!(matches.len(), 2);
        assert_eq!(TITLES[matches[0].0], "The Dark Knight");
        assert_eq!(TITLES[matches[1].0], "The Dark Knight Rises");
        assert!(matches[0].1 >= matches[1].1);
    }

    #[test]
    fn test_top_matches_zero_limit() {
        assert!(top_matches("avatar", TITLES, 0).is_empty());
    }
}
