//! Match result types

use serde::{Deserialize, Serialize};

/// Decision produced by one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// A track cleared the minimum score
    Match {
        /// Identified track
        track_id: u32,
        /// Height of the winning offset-histogram bin
        score: u32,
        /// Winning time offset in bins (db anchor time minus query anchor
        /// time); for a sub-clip this recovers where the clip starts inside
        /// the indexed track
        offset: i64,
    },
    /// No track cleared the minimum score; an expected outcome, not an error
    NoMatch {
        /// Best score seen across all candidates (0 if none voted)
        best_score: u32,
    },
}

/// Diagnostics describing how a query was resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    /// Number of tokens in the query's hash stream
    pub query_tokens: usize,
    /// Number of candidate tracks that received at least one vote
    pub candidates: usize,
    /// Wall-clock matching time in milliseconds
    pub processing_time_ms: f32,
}

/// Outcome of a query plus its diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The match decision
    pub outcome: MatchOutcome,
    /// Query diagnostics
    pub report: QueryReport,
}

impl MatchResult {
    /// Identified track id, if the query matched
    pub fn track_id(&self) -> Option<u32> {
        match self.outcome {
            MatchOutcome::Match { track_id, .. } => Some(track_id),
            MatchOutcome::NoMatch { .. } => None,
        }
    }

    /// Winning score (best score seen, for a no-match)
    pub fn score(&self) -> u32 {
        match self.outcome {
            MatchOutcome::Match { score, .. } => score,
            MatchOutcome::NoMatch { best_score } => best_score,
        }
    }

    /// True if a track was identified
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Match { .. })
    }
}
