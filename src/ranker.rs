use std::cmp::Reverse;

use float_ord::FloatOrd;
use strsim::normalized_levenshtein;

use crate::{options::RankWeights, CandidateRecord, MatchResult};

/// Normalized Levenshtein similarity in `[0, 1]`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

pub fn score_record(query: &str, record: &CandidateRecord, weights: &RankWeights) -> f64 {
    let query = query.to_lowercase();
    let title = similarity(&query, &record.title.to_lowercase());
    let original = record
        .original_title
        .as_deref()
        .map_or(0.0, |original| similarity(&query, &original.to_lowercase()));
    let text = title.max(original);

    let popularity = record
        .popularity
        .map_or(0.0, |popularity| (popularity / weights.popularity_norm).clamp(0.0, 1.0));
    let votes = record
        .vote_count
        .map_or(0.0, |votes| (votes as f64 / weights.vote_norm).min(1.0));

    weights.text * text + weights.popularity * popularity + weights.votes * votes
}

/// Every record scored against `query`, best first. Equal scores keep their input order.
pub fn rank<'a>(
    query: &str,
    records: &'a [CandidateRecord],
    weights: &RankWeights,
) -> Vec<MatchResult<'a>> {
    let mut ranked = records
        .iter()
        .map(|record| MatchResult {
            record,
            score: score_record(query, record, weights),
        })
        .collect::<Vec<_>>();
    ranked.sort_by_key(|result| Reverse(FloatOrd(result.score)));
    ranked
}

pub fn best_match<'a>(
    query: &str,
    records: &'a [CandidateRecord],
    weights: &RankWeights,
) -> Option<MatchResult<'a>> {
    let best = rank(query, records, weights).into_iter().next();
    if let Some(best) = &best {
        log::debug!(
            "Best match for {query:?}: {:?} ({:.3})",
            best.record.title,
            best.score
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_edges() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("inception", "inception"), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn no_transpositions() {
        assert!((similarity("ab", "ba") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn original_title_counts() {
        let weights = RankWeights::default();
        let record = CandidateRecord::new("Spirited Away").with_original_title("Sen to Chihiro");
        let score = score_record("SEN TO CHIHIRO", &record, &weights);
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn popularity_and_votes_saturate() {
        let weights = RankWeights::default();
        let record = CandidateRecord::new("Jaws")
            .with_popularity(450.0)
            .with_vote_count(20_000);
        assert!((score_record("jaws", &record, &weights) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_records_have_no_match() {
        assert!(best_match("X", &[], &RankWeights::default()).is_none());
    }
}
