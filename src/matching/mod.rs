//! Offset-alignment voting matcher
//!
//! Each query token is looked up in the index; every stored occurrence casts
//! one vote for (its track, db_anchor_time - query_anchor_time). A true
//! match is a time-shifted sub-segment of an indexed track, so its surviving
//! tokens agree on a single offset and pile into one tall histogram bin,
//! while noise and accidental token collisions scatter across offsets. The
//! tallest bin per track is that track's score; the globally tallest bin
//! decides the match.

pub mod result;

pub use result::{MatchOutcome, MatchResult, QueryReport};

use std::collections::HashMap;
use std::time::Instant;

use crate::hashing::TokenFingerprint;
use crate::index::FingerprintIndex;

/// Match a query's hash stream against an index
///
/// Stateless and side-effect free: the index is only read, and repeated
/// calls with the same inputs produce the same outcome.
///
/// # Arguments
///
/// * `query` - The query clip's token stream
/// * `index` - Index to search; must have been built with the same
///   [`EngineConfig`](crate::EngineConfig) as the query's fingerprint
/// * `min_score` - Minimum winning bin height to report a match
///
/// # Tie-breaking
///
/// Equal-score tracks resolve to the lowest track id, and equal-height bins
/// within a track resolve to the smallest offset. Both rules are arbitrary
/// but documented so results stay reproducible; they carry no musical
/// meaning.
pub fn match_tokens(
    query: &[TokenFingerprint],
    index: &FingerprintIndex,
    min_score: u32,
) -> MatchResult {
    let start_time = Instant::now();

    let mut histograms: HashMap<u32, HashMap<i64, u32>> = HashMap::new();
    for fingerprint in query {
        for occurrence in index.lookup(fingerprint.token) {
            let offset = occurrence.anchor_time as i64 - fingerprint.anchor_time as i64;
            *histograms
                .entry(occurrence.track_id)
                .or_default()
                .entry(offset)
                .or_default() += 1;
        }
    }

    let candidates = histograms.len();
    let mut winner: Option<(u32, u32, i64)> = None; // (score, track_id, offset)
    for (&track_id, histogram) in &histograms {
        let mut track_best: Option<(u32, i64)> = None;
        for (&offset, &count) in histogram {
            let better = match track_best {
                None => true,
                Some((best_count, best_offset)) => {
                    count > best_count || (count == best_count && offset < best_offset)
                }
            };
            if better {
                track_best = Some((count, offset));
            }
        }
        if let Some((score, offset)) = track_best {
            let better = match winner {
                None => true,
                Some((best_score, best_track, _)) => {
                    score > best_score || (score == best_score && track_id < best_track)
                }
            };
            if better {
                winner = Some((score, track_id, offset));
            }
        }
    }

    let outcome = match winner {
        Some((score, track_id, offset)) if score >= min_score => MatchOutcome::Match {
            track_id,
            score,
            offset,
        },
        Some((score, _, _)) => MatchOutcome::NoMatch { best_score: score },
        None => MatchOutcome::NoMatch { best_score: 0 },
    };

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::debug!(
        "Matched {} query tokens against {} candidates in {:.2} ms: {:?}",
        query.len(),
        candidates,
        processing_time_ms,
        outcome
    );

    MatchResult {
        outcome,
        report: QueryReport {
            query_tokens: query.len(),
            candidates,
            processing_time_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(entries: &[(u32, u32)]) -> Vec<TokenFingerprint> {
        entries
            .iter()
            .map(|&(token, anchor_time)| TokenFingerprint { token, anchor_time })
            .collect()
    }

    #[test]
    fn test_aligned_votes_win() {
        let mut index = FingerprintIndex::new();
        // Track 0: tokens anchored at 10, 20, 30
        index.insert(0, &stream(&[(1, 10), (2, 20), (3, 30)]));

        // Query is the same material shifted 10 bins earlier
        let query = stream(&[(1, 0), (2, 10), (3, 20)]);
        let result = match_tokens(&query, &index, 3);

        assert_eq!(
            result.outcome,
            MatchOutcome::Match {
                track_id: 0,
                score: 3,
                offset: 10
            }
        );
        assert_eq!(result.report.query_tokens, 3);
        assert_eq!(result.report.candidates, 1);
    }

    #[test]
    fn test_scattered_votes_do_not_accumulate() {
        let mut index = FingerprintIndex::new();
        index.insert(0, &stream(&[(1, 10), (2, 50), (3, 90)]));

        // Same tokens but inconsistent offsets: 10, 45, 60
        let query = stream(&[(1, 0), (2, 5), (3, 30)]);
        let result = match_tokens(&query, &index, 2);

        assert_eq!(result.outcome, MatchOutcome::NoMatch { best_score: 1 });
    }

    #[test]
    fn test_below_min_score_is_no_match() {
        let mut index = FingerprintIndex::new();
        index.insert(0, &stream(&[(1, 10), (2, 20)]));

        let query = stream(&[(1, 0), (2, 10)]);
        let result = match_tokens(&query, &index, 5);

        assert_eq!(result.outcome, MatchOutcome::NoMatch { best_score: 2 });
        assert!(!result.is_match());
        assert_eq!(result.score(), 2);
    }

    #[test]
    fn test_strongest_track_wins() {
        let mut index = FingerprintIndex::new();
        index.insert(0, &stream(&[(1, 0), (9, 50)]));
        index.insert(1, &stream(&[(1, 5), (2, 15), (3, 25)]));

        let query = stream(&[(1, 0), (2, 10), (3, 20)]);
        let result = match_tokens(&query, &index, 1);

        assert_eq!(result.track_id(), Some(1));
        assert_eq!(result.score(), 3);
        assert_eq!(result.report.candidates, 2);
    }

    #[test]
    fn test_equal_scores_resolve_to_lowest_track_id() {
        let mut index = FingerprintIndex::new();
        index.insert(5, &stream(&[(1, 10), (2, 20)]));
        index.insert(3, &stream(&[(1, 10), (2, 20)]));

        let query = stream(&[(1, 0), (2, 10)]);
        let result = match_tokens(&query, &index, 1);

        assert_eq!(result.track_id(), Some(3));
    }

    #[test]
    fn test_negative_offsets_supported() {
        // Query anchored later than the indexed material
        let mut index = FingerprintIndex::new();
        index.insert(0, &stream(&[(1, 0), (2, 10)]));

        let query = stream(&[(1, 40), (2, 50)]);
        let result = match_tokens(&query, &index, 2);

        assert_eq!(
            result.outcome,
            MatchOutcome::Match {
                track_id: 0,
                score: 2,
                offset: -40
            }
        );
    }

    #[test]
    fn test_empty_query_and_empty_index() {
        let index = FingerprintIndex::new();
        let result = match_tokens(&[], &index, 5);
        assert_eq!(result.outcome, MatchOutcome::NoMatch { best_score: 0 });
        assert_eq!(result.report.candidates, 0);

        let query = stream(&[(1, 0)]);
        let result = match_tokens(&query, &index, 5);
        assert_eq!(result.outcome, MatchOutcome::NoMatch { best_score: 0 });
    }
}
