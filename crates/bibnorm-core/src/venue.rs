//! Venue name resolution
//!
//! DBLP keys look like `journals/tist/YangLCT19`; the first two segments
//! identify the venue. The venue index is searched with that prefix and the
//! hit whose URL is exactly the venue's db page supplies the display name.

use crate::candidate::VenueHit;
use crate::error::Result;
use crate::sources::BibliographicIndex;

/// Coarse venue key: the first two `/` segments of an indexing key
pub fn venue_key(indexing_key: &str) -> Option<String> {
    let mut segments = indexing_key.split('/');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let second = segments.next().filter(|s| !s.is_empty())?;
    Some(format!("{}/{}", first, second))
}

/// Remove the exact ` (ACRONYM)` annotation, then cut at the first comma
pub fn clean_venue_name(name: &str, acronym: Option<&str>) -> String {
    let name = match acronym {
        Some(acronym) => name.replace(&format!(" ({})", acronym), ""),
        None => name.to_string(),
    };
    match name.split_once(',') {
        Some((head, _)) => head.to_string(),
        None => name,
    }
}

/// The first hit whose URL equals `expected_url`
pub fn select_venue<'a>(hits: &'a [VenueHit], expected_url: &str) -> Option<&'a VenueHit> {
    hits.iter().find(|hit| hit.url == expected_url)
}

/// Look up the canonical venue name for an indexing key.
///
/// `Ok(None)` when the key has no venue prefix or no hit matches; request
/// and decode failures are returned as errors.
pub async fn resolve_venue<I: BibliographicIndex>(
    index: &I,
    indexing_key: &str,
) -> Result<Option<String>> {
    let Some(key) = venue_key(indexing_key) else {
        tracing::debug!("no venue prefix in key {}", indexing_key);
        return Ok(None);
    };

    let hits = index.search_venues(&key).await?;
    let expected_url = index.venue_url(&key);

    let name = select_venue(&hits, &expected_url)
        .map(|hit| clean_venue_name(&hit.name, hit.acronym.as_deref()));

    if name.is_none() {
        tracing::debug!("no venue at {} among {} hits", expected_url, hits.len());
    }
    Ok(name)
}
