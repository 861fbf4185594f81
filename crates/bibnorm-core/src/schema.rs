//! Per-entry-type field allow-lists and venue fields

use std::collections::BTreeMap;

use bibnorm_bibtex::{Entry, EntryType};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// What pruning does to entry types with an empty or missing allow-list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnconfiguredPolicy {
    /// Remove every field
    #[default]
    DropAll,
    /// Leave the fields untouched
    PassThrough,
}

/// Schema for one entry type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySchema {
    /// Lowercase field names to keep
    #[serde(default)]
    pub fields: Vec<String>,
    /// Field that receives the resolved venue name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl CategorySchema {
    fn new(fields: &[&str], venue: Option<&str>) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            venue: venue.map(str::to_string),
        }
    }
}

/// Field schema table keyed by entry type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub unconfigured: UnconfiguredPolicy,
    pub categories: BTreeMap<EntryType, CategorySchema>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        let categories = BTreeMap::from([
            (
                EntryType::Article,
                CategorySchema::new(
                    &["title", "author", "journal", "year", "volume", "number", "pages"],
                    Some("journal"),
                ),
            ),
            (
                EntryType::InProceedings,
                CategorySchema::new(
                    &["title", "author", "booktitle", "year", "pages"],
                    Some("booktitle"),
                ),
            ),
            (
                EntryType::InCollection,
                CategorySchema::new(
                    &[
                        "title",
                        "author",
                        "booktitle",
                        "editor",
                        "publisher",
                        "year",
                        "pages",
                    ],
                    Some("booktitle"),
                ),
            ),
            (EntryType::Booklet, CategorySchema::default()),
            (EntryType::Misc, CategorySchema::default()),
        ]);

        Self {
            unconfigured: UnconfiguredPolicy::default(),
            categories,
        }
    }
}

impl FieldSchema {
    /// Allow-list for an entry type; `None` when the type is absent or its
    /// list is empty
    pub fn allowed_fields(&self, entry_type: &EntryType) -> Option<&[String]> {
        self.categories
            .get(entry_type)
            .map(|c| c.fields.as_slice())
            .filter(|fields| !fields.is_empty())
    }

    /// Name of the field that holds the venue for an entry type
    pub fn venue_field(&self, entry_type: &EntryType) -> Option<&str> {
        self.categories
            .get(entry_type)
            .and_then(|c| c.venue.as_deref())
    }

    /// Whether `field` survives pruning for `entry_type`
    pub fn allows(&self, entry_type: &EntryType, field: &str) -> bool {
        match self.allowed_fields(entry_type) {
            Some(fields) => fields.iter().any(|f| f.eq_ignore_ascii_case(field)),
            None => self.unconfigured == UnconfiguredPolicy::PassThrough,
        }
    }

    /// Drop every field not allowed for the entry's type, in place
    pub fn prune(&self, entry: &mut Entry) {
        let entry_type = entry.entry_type.clone();
        entry.retain_fields(|field| self.allows(&entry_type, &field.key));
    }

    /// Venue fields must be kept by their own allow-list, or the overlay
    /// would be pruned away immediately
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (entry_type, category) in &self.categories {
            if let Some(venue) = &category.venue {
                if !category.fields.iter().any(|f| f.eq_ignore_ascii_case(venue)) {
                    return Err(ConfigError::InvalidSchema(format!(
                        "venue field '{}' of '{}' is not in its allowed fields",
                        venue, entry_type
                    )));
                }
            }
        }
        Ok(())
    }
}
