//! Decklist parsing
//!
//! Turns pasted decklist text into card lines. Quantities are stripped and kept
//! for display only; duplicates are preserved in input order.

use crate::models::DecklistLine;

/// Basic lands are never looked up, counted or classified
pub const BASIC_LANDS: [&str; 5] = ["Forest", "Island", "Mountain", "Plains", "Swamp"];

/// Section headers written by common deck exporters
const SECTION_HEADERS: [&str; 5] = ["deck", "sideboard", "commander", "companion", "maybeboard"];

/// Why a line did not produce a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    /// Only a number, no card name
    QuantityOnly,
    BasicLand,
    SectionHeader,
}

/// Result of parsing one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Card(DecklistLine),
    Skipped {
        line_number: usize,
        raw: String,
        reason: SkipReason,
    },
}

pub fn is_basic_land(name: &str) -> bool {
    BASIC_LANDS.contains(&name)
}

fn is_section_header(line: &str) -> bool {
    let header = line.strip_suffix(':').unwrap_or(line).trim();
    SECTION_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(header))
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Split a trimmed line into an optional leading quantity and the rest.
///
/// The quantity is only stripped when the leading digits are followed by
/// whitespace, so `"4x Bolt"` stays a name.
fn split_quantity(line: &str) -> (Option<u32>, &str) {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 || digits_end == line.len() {
        return (None, line);
    }

    let rest = &line[digits_end..];
    if !rest.starts_with(char::is_whitespace) {
        return (None, line);
    }

    (line[..digits_end].parse().ok(), rest.trim_start())
}

/// Parse a single raw line
pub fn parse_line(line_number: usize, raw: &str) -> ParsedLine {
    let skipped = |reason| ParsedLine::Skipped {
        line_number,
        raw: raw.to_string(),
        reason,
    };

    let line = raw.trim();
    if line.is_empty() {
        return skipped(SkipReason::Blank);
    }
    if is_section_header(line) {
        return skipped(SkipReason::SectionHeader);
    }

    let (quantity, name) = split_quantity(line);
    if name.is_empty() || is_number(name) {
        return skipped(SkipReason::QuantityOnly);
    }
    if is_basic_land(name) {
        return skipped(SkipReason::BasicLand);
    }

    ParsedLine::Card(DecklistLine {
        line_number,
        quantity,
        name: name.to_string(),
    })
}

/// Parse every line of a decklist, including the skipped ones
pub fn parse_decklist(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| parse_line(idx + 1, raw))
        .collect()
}

/// Card lines of a decklist in input order
pub fn card_lines(text: &str) -> Vec<DecklistLine> {
    parse_decklist(text)
        .into_iter()
        .filter_map(|parsed| match parsed {
            ParsedLine::Card(line) => Some(line),
            ParsedLine::Skipped { .. } => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "decklist_tests.rs"]
mod tests;
