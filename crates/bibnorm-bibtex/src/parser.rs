//! BibTeX parser implementation using nom
//!
//! The parser never fails as a whole. Each top-level construct becomes a
//! [`Block`]; anything that cannot be parsed is recorded as
//! [`Block::Failed`] with its position and the scan resumes at the next `@`.
//!
//! Handles:
//! - @string definitions (case-insensitive, expanded into later values)
//! - @preamble declarations
//! - @comment sections, `%` lines and free text between blocks
//! - Brace- or parenthesis-delimited entries
//! - Braced, quoted, numeric and macro field values joined with #
//! - Nested braces in field values

use std::collections::HashMap;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt},
    IResult,
};

use crate::entry::{Entry, EntryType};
use crate::library::{Block, FailedBlock, Library, MacroDefinition, Preamble};

/// Error type for single-entry parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no entry found in input")]
    NoEntry,
    #[error("expected exactly one entry, found {0}")]
    MultipleEntries(usize),
    #[error("malformed BibTeX at line {line}, column {column}: {message}")]
    Malformed {
        line: u32,
        column: u32,
        message: String,
    },
}

const MONTH_MACROS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parse a BibTeX document into an ordered library
pub fn parse(input: &str) -> Library {
    let mut library = Library::new();
    let mut macros: HashMap<String, String> = MONTH_MACROS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut remaining = input;

    loop {
        let rest = remaining.trim_start();
        if rest.is_empty() {
            break;
        }

        if !starts_block(rest) {
            let len = comment_run_len(rest);
            library.push(Block::Comment(rest[..len].trim_end().to_string()));
            remaining = &rest[len..];
            continue;
        }

        match parse_at_block(rest, &macros) {
            Ok((after, at)) => {
                let raw = rest[..rest.len() - after.len()].to_string();
                match at {
                    AtBlock::Entry(entry) => library.push_entry(entry),
                    AtBlock::Macro(key, value) => {
                        macros.insert(key.to_lowercase(), value.clone());
                        library.push(Block::Macro(MacroDefinition { key, value, raw }));
                    }
                    AtBlock::Preamble(text) => {
                        library.push(Block::Preamble(Preamble { text, raw }));
                    }
                    AtBlock::Comment => library.push(Block::Comment(raw)),
                }
                remaining = after;
            }
            Err(_) => {
                let (line, column) = position(input, input.len() - rest.len());
                let end = rest[1..].find('@').map(|p| p + 1).unwrap_or(rest.len());
                library.push(Block::Failed(FailedBlock {
                    raw: rest[..end].trim_end().to_string(),
                    line,
                    column,
                    message: "Failed to parse block".to_string(),
                }));
                remaining = &rest[end..];
            }
        }
    }

    library
}

/// Parse input that must contain exactly one entry and nothing malformed
pub fn parse_entry(input: &str) -> Result<Entry, ParseError> {
    let library = parse(input);

    if let Some(failed) = library.failed_blocks().next() {
        return Err(ParseError::Malformed {
            line: failed.line,
            column: failed.column,
            message: failed.message.clone(),
        });
    }

    let mut entries: Vec<Entry> = library
        .blocks
        .into_iter()
        .filter_map(|b| match b {
            Block::Entry(e) => Some(e),
            _ => None,
        })
        .collect();

    match entries.len() {
        0 => Err(ParseError::NoEntry),
        1 => Ok(entries.remove(0)),
        n => Err(ParseError::MultipleEntries(n)),
    }
}

/// Result of parsing an @ block
enum AtBlock {
    Entry(Entry),
    Macro(String, String),
    Preamble(String),
    Comment,
}

/// 1-based line and column of a byte offset
fn position(input: &str, offset: usize) -> (u32, u32) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line as u32, column as u32)
}

/// `@name{` or `@name(`: the start of a block. An `@` in an address or
/// handle is not.
fn block_header(input: &str) -> IResult<&str, ()> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = alt((char('{'), char('(')))(rest)?;
    Ok((rest, ()))
}

fn starts_block(input: &str) -> bool {
    block_header(input).is_ok()
}

/// Length of the free text before the next block. `%` lines are taken
/// whole even when they contain an `@`.
fn comment_run_len(input: &str) -> usize {
    let mut pos = 0;
    for line in input.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if pos > 0 && starts_block(trimmed) {
            break;
        }
        if !trimmed.starts_with('%') {
            let header = line
                .match_indices('@')
                .map(|(at, _)| at)
                .find(|&at| starts_block(&line[at..]));
            if let Some(at) = header {
                return pos + at;
            }
        }
        pos += line.len();
    }
    pos
}

/// Parse an @ block (entry, string, preamble, or comment)
fn parse_at_block<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, AtBlock> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, block_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match block_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, macros)?;
            Ok((rest, AtBlock::Macro(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, macros)?;
            Ok((rest, AtBlock::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtBlock::Comment))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, block_type, macros)?;
            Ok((rest, AtBlock::Entry(entry)))
        }
    }
}

/// Opening delimiter, returning the matching closer
fn open_delimiter(input: &str) -> IResult<&str, char> {
    let (rest, _) = multispace0(input)?;
    let (rest, open) = alt((char('{'), char('(')))(rest)?;
    let close = if open == '{' { '}' } else { ')' };
    let (rest, _) = multispace0(rest)?;
    Ok((rest, close))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:.+".contains(c)
}

fn parse_string_definition<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, close) = open_delimiter(input)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, (value, _)) = parse_field_value(rest, macros)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, (key.to_string(), value)))
}

fn parse_preamble<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let (rest, close) = open_delimiter(input)?;
    let (rest, (value, _)) = parse_field_value(rest, macros)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, value))
}

/// Parse a @comment body (braced content or the rest of the line)
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, Entry> {
    let (rest, close) = open_delimiter(input)?;

    let (rest, cite_key) =
        take_while1(|c: char| !c.is_whitespace() && !",{}()=\"#%".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = opt(char(','))(rest)?;

    let (rest, fields) = parse_fields(rest, macros)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    let mut entry = Entry::new(cite_key, EntryType::parse(entry_type));
    for (key, (value, bare)) in fields {
        if bare {
            entry.add_bare_field(key, value);
        } else {
            entry.add_field(key, value);
        }
    }

    Ok((rest, entry))
}

fn parse_fields<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, Vec<(String, (String, bool))>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        match parse_single_field(remaining, macros) {
            Ok((rest, field)) => {
                fields.push(field);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => return Ok((remaining, fields)),
        }
    }
}

/// Parse a single field (key = value)
fn parse_single_field<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, (String, (String, bool))> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, value) = parse_field_value(rest, macros)?;

    Ok((rest, (key.to_string(), value)))
}

enum ValuePart {
    Literal(String),
    Name(String),
}

/// Parse a field value: braced, quoted, number, or macro reference, with
/// `#` concatenation. The flag is set when the whole value is a single
/// macro name with no definition.
fn parse_field_value<'a>(
    input: &'a str,
    macros: &HashMap<String, String>,
) -> IResult<&'a str, (String, bool)> {
    let mut result = String::new();
    let mut remaining = input;
    let mut parts = 0;
    let mut undefined = false;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let (rest, part) = alt((
            map(parse_braced_value, ValuePart::Literal),
            map(parse_quoted_value, ValuePart::Literal),
            map(take_while1(|c: char| c.is_ascii_digit()), |d: &str| {
                ValuePart::Literal(d.to_string())
            }),
            map(take_while1(is_name_char), |name: &str| {
                ValuePart::Name(name.to_string())
            }),
        ))(rest)?;

        parts += 1;
        match part {
            ValuePart::Literal(text) => result.push_str(&text),
            ValuePart::Name(name) => match macros.get(&name.to_lowercase()) {
                Some(value) => result.push_str(value),
                None => {
                    undefined = true;
                    result.push_str(&name);
                }
            },
        }

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, (result, parts == 1 && undefined))),
        }
    }
}

/// Parse a braced value {content}, dropping the outer braces
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    Ok((rest, content[1..content.len() - 1].to_string()))
}

/// Parse braced content including nested braces
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0usize;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            // An escaped brace does not change depth
            b'\\' if matches!(bytes.get(pos + 1), Some(b'{') | Some(b'}')) => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a quoted value "content". Quotes inside braces do not terminate,
/// and braces must balance.
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    };

    let mut depth = 0usize;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            // Could not be written back inside braces
            '}' if depth == 0 => break,
            '}' => depth -= 1,
            '"' if depth == 0 => return Ok((&body[i + 1..], body[..i].to_string())),
            _ => {}
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}
