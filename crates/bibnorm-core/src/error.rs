//! Error types for bibnorm-core

use thiserror::Error;

use crate::http::HttpError;

/// Result type alias for reconciliation steps
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Why a single entry could not be replaced by a canonical record.
///
/// Every variant is recoverable: the pipeline keeps the (pruned) original
/// entry and records a diagnostic.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The entry has no title to search for
    #[error("entry has no title")]
    MissingTitle,

    /// The remote search returned no candidates
    #[error("no search results for \"{query}\"")]
    NoCandidates { query: String },

    /// The best candidate did not clear the acceptance threshold
    #[error("best candidate \"{candidate}\" is not close enough to \"{query}\" (similarity {similarity:.3})")]
    BelowThreshold {
        query: String,
        candidate: String,
        similarity: f64,
    },

    /// A remote request failed at the transport or status level
    #[error("fetch failed: {0}")]
    Fetch(#[from] HttpError),

    /// A remote response could not be decoded
    #[error("parse failed: {0}")]
    Parse(String),
}

/// Coarse failure classification used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotFound,
    Fetch,
    Parse,
}

impl ReconcileError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingTitle | Self::NoCandidates { .. } | Self::BelowThreshold { .. } => {
                FailureKind::NotFound
            }
            Self::Fetch(_) => FailureKind::Fetch,
            Self::Parse(_) => FailureKind::Parse,
        }
    }
}

impl From<bibnorm_bibtex::ParseError> for ReconcileError {
    fn from(err: bibnorm_bibtex::ParseError) -> Self {
        ReconcileError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Parse(err.to_string())
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Fetch => write!(f, "fetch error"),
            FailureKind::Parse => write!(f, "parse error"),
        }
    }
}
