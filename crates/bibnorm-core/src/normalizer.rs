//! Turn an accepted candidate into a pruned canonical entry

use bibnorm_bibtex::{parse_entry, Entry};

use crate::candidate::CandidateRecord;
use crate::error::Result;
use crate::schema::FieldSchema;
use crate::sources::BibliographicIndex;
use crate::venue::resolve_venue;

/// Fetch the candidate's detail record, overlay the canonical venue name and
/// prune it to the schema.
///
/// The returned entry still carries the remote cite key; the caller
/// replaces it with the key of the entry being reconciled.
pub async fn normalize<I: BibliographicIndex>(
    index: &I,
    schema: &FieldSchema,
    candidate: &CandidateRecord,
) -> Result<Entry> {
    let raw = index.fetch_record(candidate).await?;
    let mut record = parse_entry(&raw)?;

    if candidate.kind.has_indexed_venue() {
        if let Some(venue) = resolve_venue(index, &candidate.key).await? {
            match schema.venue_field(&record.entry_type) {
                Some(field) => record.set_field(field, venue),
                None => tracing::debug!(
                    "no venue field for {} records, keeping {}",
                    record.entry_type,
                    candidate.key
                ),
            }
        }
    }

    schema.prune(&mut record);
    Ok(record)
}
