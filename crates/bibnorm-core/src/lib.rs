//! bibnorm-core: reconcile BibTeX entries against DBLP
//!
//! For every entry of a library the title is searched on DBLP, the hits are
//! re-ranked by local title similarity, and a confident match replaces the
//! entry with DBLP's own BibTeX record, pruned to a per-type field schema
//! and with the venue name canonicalized. Entries without a confident match
//! are kept, pruned to the same schema.
//!
//! - `ranker`: similarity ranking and the acceptance threshold
//! - `venue`: venue name lookup and cleanup
//! - `normalizer`: detail fetch, venue overlay, pruning
//! - `pipeline`: per-entry driver with fallback and diagnostics
//! - `sources`: the remote index trait and the DBLP implementation

pub mod candidate;
pub mod config;
pub mod error;
pub mod http;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod schema;
pub mod similarity;
pub mod sources;
pub mod venue;

pub use candidate::{CandidateRecord, PublicationKind, VenueHit};
pub use config::{ConfigError, DblpConfig, HttpConfig, ReconcileConfig};
pub use error::{FailureKind, ReconcileError};
pub use normalizer::normalize;
pub use pipeline::{Diagnostic, ReconcileReport, Reconciler};
pub use ranker::{normalize_title, rank_and_select, ACCEPT_THRESHOLD};
pub use schema::{CategorySchema, FieldSchema, UnconfiguredPolicy};
pub use similarity::{similarity_ratio, Similarity};
pub use sources::{BibliographicIndex, DblpSource};
pub use venue::{clean_venue_name, resolve_venue};
