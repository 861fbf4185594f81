//! BibTeX entry data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// BibTeX entry type
///
/// Types outside the standard set keep their (lowercased) name so they can
/// be written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Other(String),
}

impl EntryType {
    /// Parse an entry type from a string (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntryType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<EntryType> for String {
    fn from(t: EntryType) -> Self {
        t.as_str().to_string()
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
    /// An `@string` name with no definition in the file, kept by name and
    /// written back without delimiters
    pub bare: bool,
}

/// A parsed BibTeX entry. Field order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub cite_key: String,
    pub entry_type: EntryType,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(cite_key: impl Into<String>, entry_type: EntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Append a field without checking for an existing one
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            key: key.into(),
            value: value.into(),
            bare: false,
        });
    }

    /// Append a field holding an undefined macro name
    pub(crate) fn add_bare_field(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.fields.push(Field {
            key: key.into(),
            value: name.into(),
            bare: true,
        });
    }

    /// Builder form of [`Entry::add_field`]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some()
    }

    /// Replace the value of an existing field (keeping its position), or
    /// append the field when it is missing.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.key.eq_ignore_ascii_case(key)) {
            Some(field) => {
                field.value = value;
                field.bare = false;
            }
            None => self.add_field(key, value),
        }
    }

    /// Remove a field, returning its value
    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        let pos = self
            .fields
            .iter()
            .position(|f| f.key.eq_ignore_ascii_case(key))?;
        Some(self.fields.remove(pos).value)
    }

    /// Keep only the fields for which `keep` returns true
    pub fn retain_fields<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Field) -> bool,
    {
        self.fields.retain(|f| keep(f));
    }

    /// Lowercased field names, in order
    pub fn field_names(&self) -> impl Iterator<Item = String> + '_ {
        self.fields.iter().map(|f| f.key.to_lowercase())
    }

    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get_field("author")
    }

    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }

    pub fn journal(&self) -> Option<&str> {
        self.get_field("journal")
    }

    pub fn booktitle(&self) -> Option<&str> {
        self.get_field("booktitle")
    }
}
