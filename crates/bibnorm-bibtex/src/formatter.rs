//! BibTeX formatting module
//!
//! Entries are rendered from their fields. Every other block is written
//! back exactly as it was read.

use crate::entry::Entry;
use crate::library::{Block, Library};

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &Entry) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(entry.entry_type.as_str());
    result.push('{');
    result.push_str(&entry.cite_key);
    result.push(',');
    result.push('\n');

    for field in &entry.fields {
        result.push_str("    ");
        result.push_str(&field.key);
        result.push_str(" = ");
        if field.bare {
            result.push_str(&field.value);
        } else {
            result.push_str(&format_field_value(&field.value));
        }
        result.push(',');
        result.push('\n');
    }

    result.push('}');
    result
}

/// Format multiple entries separated by blank lines
pub fn format_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    entries
        .into_iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format a whole library, blocks in order, with a trailing newline
pub fn format_library(library: &Library) -> String {
    let mut result = library
        .blocks
        .iter()
        .map(|block| match block {
            Block::Entry(entry) => format_entry(entry),
            Block::Macro(m) => m.raw.clone(),
            Block::Preamble(p) => p.raw.clone(),
            Block::Comment(text) => text.clone(),
            Block::Failed(failed) => failed.raw.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if !result.is_empty() {
        result.push('\n');
    }
    result
}

/// Numbers are written bare, everything else in braces so that LaTeX
/// commands and case protection survive
fn format_field_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len() + 2);
    result.push('{');
    result.push_str(value);
    result.push('}');
    result
}
