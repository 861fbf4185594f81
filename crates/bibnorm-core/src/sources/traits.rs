//! Common traits for remote bibliographic indexes

use crate::candidate::{CandidateRecord, VenueHit};
use crate::error::Result;

/// The remote collaborators of the reconciliation pipeline.
///
/// Calls are awaited one at a time; implementations need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait BibliographicIndex {
    /// Title search. An empty vector means no hits, not a failure.
    async fn search_publications(&self, title: &str) -> Result<Vec<CandidateRecord>>;

    /// Raw BibTeX detail record for a candidate
    async fn fetch_record(&self, candidate: &CandidateRecord) -> Result<String>;

    /// Venue search by coarse key such as `journals/tist`
    async fn search_venues(&self, venue_key: &str) -> Result<Vec<VenueHit>>;

    /// Canonical URL a venue hit must have to match `venue_key`
    fn venue_url(&self, venue_key: &str) -> String;
}
