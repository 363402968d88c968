//! "Did you mean" suggestions for unrecognised names.
//!
//! Candidates are ranked by the cosine similarity of their character-bigram
//! profiles, compared case-blind. Ties go to the candidate with the smaller
//! edit distance, then to the alphabetically earlier one. Candidates below
//! [`MIN_SIMILARITY`] are never offered.

use std::collections::HashMap;

/// How many suggestions to offer at most.
pub const MAX_SUGGESTIONS: usize = 3;

/// Similarity below which a candidate is not worth suggesting.
pub const MIN_SIMILARITY: f64 = 0.4;

const NGRAM_LEN: usize = 2;

/// Rank `candidates` against `target` and return the best few, closest first.
///
/// Never fails: an empty target or an empty pool gives an empty list.
pub fn suggest<'a, I>(target: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let target = target.to_lowercase();
    let profile = ngrams(&target);
    if profile.is_empty() {
        return vec![];
    }

    let mut scored: Vec<(f64, usize, &str)> = candidates
        .into_iter()
        .filter_map(|cand| {
            let lower = cand.to_lowercase();
            let score = cosine(&profile, &ngrams(&lower));
            (score >= MIN_SIMILARITY).then(|| (score, strsim::levenshtein(&target, &lower), cand))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(b.2))
    });
    scored.dedup_by(|a, b| a.2 == b.2);

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, _, name)| name.to_string())
        .collect()
}

/// Format suggestions as a message suffix: `", did you mean: a, b or c?"`.
/// Empty when there is nothing to suggest.
pub fn did_you_mean(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(", did you mean: {only}?"),
        [init @ .., last] => format!(", did you mean: {} or {last}?", init.join(", ")),
    }
}

/// Bigram counts. Strings shorter than a bigram count as a single gram.
fn ngrams(s: &str) -> HashMap<String, usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut grams = HashMap::new();
    if chars.is_empty() {
        return grams;
    }
    if chars.len() < NGRAM_LEN {
        grams.insert(s.to_string(), 1);
        return grams;
    }
    for w in chars.windows(NGRAM_LEN) {
        *grams.entry(w.iter().collect()).or_insert(0) += 1;
    }
    grams
}

fn cosine(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: usize = a
        .iter()
        .filter_map(|(g, n)| b.get(g).map(|m| n * m))
        .sum();
    let norm = |m: &HashMap<String, usize>| (m.values().map(|n| n * n).sum::<usize>() as f64).sqrt();
    dot as f64 / (norm(a) * norm(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typo_is_suggested() {
        let got = suggest("ivall", ["ival", "p1", "verbose"]);
        assert_eq!(got, vec!["ival".to_string()]);
    }

    #[test]
    fn match_is_case_insensitive() {
        let got = suggest("VERBOSE", ["verbose", "quiet"]);
        assert_eq!(got, vec!["verbose".to_string()]);
    }

    #[test]
    fn at_most_three_best_first() {
        let got = suggest(
            "colour",
            ["colour-a", "colour", "colours", "colour-bb", "size"],
        );
        assert_eq!(got.len(), MAX_SUGGESTIONS);
        assert_eq!(got[0], "colour");
        assert!(!got.contains(&"size".to_string()));
    }

    #[test]
    fn empty_pool_gives_nothing() {
        let got = suggest("anything", std::iter::empty());
        assert!(got.is_empty());
    }

    #[test]
    fn empty_target_gives_nothing() {
        assert!(suggest("", ["a", "b"]).is_empty());
    }

    #[test]
    fn unrelated_names_are_not_offered() {
        assert!(suggest("xyz", ["alpha", "beta"]).is_empty());
    }

    #[test]
    fn single_char_names_still_compare() {
        assert_eq!(suggest("N", ["n", "m"]), vec!["n".to_string()]);
    }

    #[test]
    fn duplicates_are_collapsed() {
        assert_eq!(suggest("ival", ["ival", "ival"]), vec!["ival".to_string()]);
    }

    #[test]
    fn did_you_mean_formats() {
        assert_eq!(did_you_mean(&[]), "");
        assert_eq!(did_you_mean(&["a".into()]), ", did you mean: a?");
        assert_eq!(
            did_you_mean(&["a".into(), "b".into(), "c".into()]),
            ", did you mean: a, b or c?"
        );
    }
}
