//! Remote search hits considered as canonical matches

/// Publication classification in the remote index's taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicationKind {
    JournalArticle,
    ConferencePaper,
    /// Preprints and other non-peer-reviewed listings
    Informal,
    Other(String),
}

impl PublicationKind {
    /// Map a DBLP `type` label
    pub fn from_label(label: &str) -> Self {
        match label {
            "Journal Articles" => Self::JournalArticle,
            "Conference and Workshop Papers" => Self::ConferencePaper,
            "Informal Publications" | "Informal and Other Publications" => Self::Informal,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_informal(&self) -> bool {
        matches!(self, Self::Informal)
    }

    /// Kinds whose venue name is looked up in the venue index
    pub fn has_indexed_venue(&self) -> bool {
        matches!(self, Self::JournalArticle | Self::ConferencePaper)
    }
}

/// One remote search hit
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Indexing key, e.g. `journals/tist/YangLCT19`
    pub key: String,
    /// Record URL, e.g. `https://dblp.org/rec/journals/tist/YangLCT19`
    pub url: String,
    pub kind: PublicationKind,
    pub title: String,
    /// Relevance score from the remote ranking
    pub score: f64,
}

/// One remote venue search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueHit {
    /// Canonical venue URL, e.g. `https://dblp.org/db/journals/tist/`
    pub url: String,
    /// Display name, possibly with acronym and qualifiers
    pub name: String,
    pub acronym: Option<String>,
}
