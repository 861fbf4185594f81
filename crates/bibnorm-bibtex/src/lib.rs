//! BibTeX library parsing and formatting
//!
//! A library is kept as an ordered list of blocks so that everything that is
//! not an entry (comments, `@string` macros, preambles, fragments that failed
//! to parse) can be written back verbatim and in place.
//!
//! Features:
//! - Nom-based parser with error recovery
//! - `@string` macro expansion and `#` concatenation
//! - Case-insensitive field access and in-place field pruning
//! - Round-trip formatting of non-entry blocks

mod entry;
mod formatter;
mod library;
pub mod parser;

pub use entry::{Entry, EntryType, Field};
pub use formatter::{format_entries, format_entry, format_library};
pub use library::{Block, BlockSummary, FailedBlock, Library, MacroDefinition, Preamble};
pub use parser::{parse, parse_entry, ParseError};
