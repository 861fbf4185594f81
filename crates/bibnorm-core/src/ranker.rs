//! Candidate ranking and acceptance
//!
//! The remote relevance score rewards loose matches, so candidates are
//! re-ranked locally by title similarity. Ties go to formally published
//! records over informal listings. The winner is accepted only when its
//! similarity is strictly above [`ACCEPT_THRESHOLD`].

use std::cmp::Ordering;

use crate::candidate::CandidateRecord;
use crate::error::{ReconcileError, Result};
use crate::similarity::Similarity;

/// Minimum similarity (exclusive) as `numerator / denominator`
pub const ACCEPT_THRESHOLD: (u64, u64) = (9, 10);

/// Collapse whitespace runs, including newlines, into single spaces
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A candidate together with its similarity to the query title
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a CandidateRecord,
    pub similarity: Similarity,
}

impl ScoredCandidate<'_> {
    /// Similarity first; on a tie, informal records rank lower
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.similarity.cmp(&other.similarity).then_with(|| {
            let self_formal = !self.candidate.kind.is_informal();
            let other_formal = !other.candidate.kind.is_informal();
            self_formal.cmp(&other_formal)
        })
    }
}

/// Score every candidate against an already normalized title
pub fn score_candidates<'a>(
    normalized_title: &str,
    candidates: &'a [CandidateRecord],
) -> Vec<ScoredCandidate<'a>> {
    candidates
        .iter()
        .map(|candidate| ScoredCandidate {
            candidate,
            similarity: Similarity::between(normalized_title, &candidate.title),
        })
        .collect()
}

/// Pick the best candidate for `title` and apply the acceptance threshold.
///
/// Among candidates that rank equal, the last one in input order wins, the
/// same result a stable sort followed by taking the last element gives.
pub fn rank_and_select(title: &str, candidates: &[CandidateRecord]) -> Result<CandidateRecord> {
    let query = normalize_title(title);
    let scored = score_candidates(&query, candidates);

    let best = scored
        .iter()
        .max_by(|a, b| a.rank_cmp(b))
        .ok_or_else(|| ReconcileError::NoCandidates {
            query: query.clone(),
        })?;

    let (numerator, denominator) = ACCEPT_THRESHOLD;
    if best.similarity.exceeds(numerator, denominator) {
        tracing::debug!(
            "accepted {} ({:.3}) for \"{}\"",
            best.candidate.key,
            best.similarity.ratio(),
            query
        );
        Ok(best.candidate.clone())
    } else {
        Err(ReconcileError::BelowThreshold {
            query,
            candidate: best.candidate.title.clone(),
            similarity: best.similarity.ratio(),
        })
    }
}
