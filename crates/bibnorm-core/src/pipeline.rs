//! Reconciliation pipeline
//!
//! Entries are processed one at a time in library order. Each entry is
//! either replaced by its canonical record or kept (pruned) with a
//! diagnostic; no entry is dropped and non-entry blocks pass through in
//! place.

use bibnorm_bibtex::{Block, Entry, Library};

use crate::config::ReconcileConfig;
use crate::error::{FailureKind, ReconcileError, Result};
use crate::http::HttpError;
use crate::normalizer::normalize;
use crate::ranker::{normalize_title, rank_and_select};
use crate::schema::FieldSchema;
use crate::sources::{BibliographicIndex, DblpSource};

/// Why an entry was kept instead of replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub cite_key: String,
    pub title: Option<String>,
    pub kind: FailureKind,
    pub message: String,
}

impl Diagnostic {
    fn new(entry: &Entry, err: &ReconcileError) -> Self {
        Self {
            cite_key: entry.cite_key.clone(),
            title: entry.title().map(normalize_title),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Output of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub library: Library,
    /// Entries replaced by a canonical record
    pub replaced: usize,
    /// One per entry that fell back to its original
    pub diagnostics: Vec<Diagnostic>,
}

impl ReconcileReport {
    pub fn kept(&self) -> usize {
        self.diagnostics.len()
    }
}

pub struct Reconciler<I> {
    index: I,
    schema: FieldSchema,
}

impl Reconciler<DblpSource> {
    /// DBLP-backed reconciler
    pub fn from_config(config: &ReconcileConfig) -> std::result::Result<Self, HttpError> {
        Ok(Self::new(DblpSource::new(config)?, config.schema.clone()))
    }
}

impl<I: BibliographicIndex> Reconciler<I> {
    pub fn new(index: I, schema: FieldSchema) -> Self {
        Self { index, schema }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Find and build the canonical replacement for one entry. The result
    /// carries the entry's own cite key.
    pub async fn reconcile_entry(&self, entry: &Entry) -> Result<Entry> {
        let title = entry
            .title()
            .map(normalize_title)
            .filter(|t| !t.is_empty())
            .ok_or(ReconcileError::MissingTitle)?;

        let candidates = self.index.search_publications(&title).await?;
        if candidates.is_empty() {
            return Err(ReconcileError::NoCandidates { query: title });
        }

        let winner = rank_and_select(&title, &candidates)?;
        let mut record = normalize(&self.index, &self.schema, &winner).await?;
        record.cite_key = entry.cite_key.clone();
        Ok(record)
    }

    /// Reconcile every entry of a library
    pub async fn reconcile(&self, library: Library) -> ReconcileReport {
        let total = library.entry_count();
        let mut report = ReconcileReport {
            library: Library::new(),
            ..Default::default()
        };
        let mut position = 0;

        for block in library.blocks {
            let Block::Entry(mut entry) = block else {
                report.library.push(block);
                continue;
            };

            position += 1;
            tracing::info!("[{}/{}] {}", position, total, entry.cite_key);

            match self.reconcile_entry(&entry).await {
                Ok(record) => {
                    report.replaced += 1;
                    report.library.push_entry(record);
                }
                Err(err) => {
                    let diagnostic = Diagnostic::new(&entry, &err);
                    tracing::warn!(
                        "keeping {} ({}): {}",
                        diagnostic.cite_key,
                        diagnostic.title.as_deref().unwrap_or("untitled"),
                        diagnostic.message
                    );
                    report.diagnostics.push(diagnostic);

                    self.schema.prune(&mut entry);
                    report.library.push_entry(entry);
                }
            }
        }

        report
    }
}
