//! Ordered BibTeX library model

use crate::entry::Entry;

/// A `@string{key = value}` definition. `raw` is the source text as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroDefinition {
    pub key: String,
    pub value: String,
    pub raw: String,
}

/// A `@preamble{...}` declaration. `raw` is the source text as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub text: String,
    pub raw: String,
}

/// Source text the parser could not make sense of. Kept so that writing the
/// library back never loses content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBlock {
    pub raw: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// One top-level construct of a BibTeX file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Entry(Entry),
    Macro(MacroDefinition),
    Preamble(Preamble),
    /// `@comment{...}`, `%` lines, or free text between blocks, verbatim
    Comment(String),
    Failed(FailedBlock),
}

/// Counts of each block kind, for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSummary {
    pub blocks: usize,
    pub entries: usize,
    pub comments: usize,
    pub macros: usize,
    pub preambles: usize,
    pub failed: usize,
}

/// A parsed BibTeX file: blocks in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub blocks: Vec<Block>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn push_entry(&mut self, entry: Entry) {
        self.blocks.push(Block::Entry(entry));
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Entry(e) => Some(e),
            _ => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    pub fn failed_blocks(&self) -> impl Iterator<Item = &FailedBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Failed(f) => Some(f),
            _ => None,
        })
    }

    pub fn summary(&self) -> BlockSummary {
        let mut summary = BlockSummary {
            blocks: self.blocks.len(),
            ..Default::default()
        };
        for block in &self.blocks {
            match block {
                Block::Entry(_) => summary.entries += 1,
                Block::Macro(_) => summary.macros += 1,
                Block::Preamble(_) => summary.preambles += 1,
                Block::Comment(_) => summary.comments += 1,
                Block::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}
