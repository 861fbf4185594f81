//! In-memory stand-in for the remote bibliographic index

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use bibnorm_core::error::Result;
use bibnorm_core::http::HttpError;
use bibnorm_core::{BibliographicIndex, CandidateRecord, PublicationKind, ReconcileError, VenueHit};

pub const DB_BASE: &str = "https://dblp.org/db";

/// Canned search hits, detail records and venues keyed by query
#[derive(Default)]
pub struct MockIndex {
    publications: HashMap<String, Vec<CandidateRecord>>,
    records: HashMap<String, String>,
    venues: HashMap<String, Vec<VenueHit>>,
    failing_searches: HashSet<String>,
    /// Every remote call in order, as `kind:argument`
    pub calls: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl MockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_publications(mut self, title: &str, candidates: Vec<CandidateRecord>) -> Self {
        self.publications.insert(title.to_string(), candidates);
        self
    }

    pub fn with_record(mut self, url: &str, bibtex: &str) -> Self {
        self.records.insert(url.to_string(), bibtex.to_string());
        self
    }

    pub fn with_venue(mut self, venue_key: &str, hits: Vec<VenueHit>) -> Self {
        self.venues.insert(venue_key.to_string(), hits);
        self
    }

    pub fn failing_search(mut self, title: &str) -> Self {
        self.failing_searches.insert(title.to_string());
        self
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl BibliographicIndex for MockIndex {
    async fn search_publications(&self, title: &str) -> Result<Vec<CandidateRecord>> {
        self.calls.borrow_mut().push(format!("search:{}", title));
        if self.failing_searches.contains(title) {
            return Err(ReconcileError::Fetch(HttpError::Timeout));
        }
        Ok(self.publications.get(title).cloned().unwrap_or_default())
    }

    async fn fetch_record(&self, candidate: &CandidateRecord) -> Result<String> {
        self.calls.borrow_mut().push(format!("record:{}", candidate.url));
        self.records.get(&candidate.url).cloned().ok_or_else(|| {
            ReconcileError::Fetch(HttpError::Status {
                status: 404,
                url: format!("{}.bib", candidate.url),
            })
        })
    }

    async fn search_venues(&self, venue_key: &str) -> Result<Vec<VenueHit>> {
        self.calls.borrow_mut().push(format!("venue:{}", venue_key));
        Ok(self.venues.get(venue_key).cloned().unwrap_or_default())
    }

    fn venue_url(&self, venue_key: &str) -> String {
        format!("{}/{}/", DB_BASE, venue_key)
    }
}

/// A search hit for `key` with the DBLP record URL layout
#[allow(dead_code)]
pub fn candidate(key: &str, kind: PublicationKind, title: &str) -> CandidateRecord {
    CandidateRecord {
        key: key.to_string(),
        url: format!("https://dblp.org/rec/{}", key),
        kind,
        title: title.to_string(),
        score: 1.0,
    }
}

#[allow(dead_code)]
pub fn venue(venue_key: &str, name: &str, acronym: Option<&str>) -> VenueHit {
    VenueHit {
        url: format!("{}/{}/", DB_BASE, venue_key),
        name: name.to_string(),
        acronym: acronym.map(str::to_string),
    }
}
