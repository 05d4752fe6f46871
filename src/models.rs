use serde::{Deserialize, Serialize};
use std::fmt;

/// One card line of a decklist after the quantity prefix was stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecklistLine {
    /// 1-based line number in the submitted text
    pub line_number: usize,
    /// Declared quantity; informational only, never used for counting
    pub quantity: Option<u32>,
    /// Card name used as lookup and dedup key
    pub name: String,
}

/// One printing of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintRecord {
    pub set_code: String,
    pub set_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl PrintRecord {
    pub fn new(set_code: &str, set_name: &str) -> Self {
        Self {
            set_code: set_code.to_string(),
            set_name: set_name.to_string(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }
}

/// A successful lookup: the card's canonical name and every printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCard {
    /// Name as the resolver spells it; used as the card's identity
    pub name: String,
    pub prints: Vec<PrintRecord>,
}

impl ResolvedCard {
    pub fn new(name: &str, prints: Vec<PrintRecord>) -> Self {
        Self {
            name: name.to_string(),
            prints,
        }
    }
}

/// A card as shown inside a set or exclusive group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEntry {
    pub name: String,
    pub image_url: Option<String>,
}

/// What happened to a single decklist line during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineOutcome {
    /// Lookup succeeded; `sets` is the number of distinct sets the card was printed in
    Resolved { sets: usize },
    NotFound,
    Failed { reason: String },
}

impl LineOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LineOutcome::Resolved { .. })
    }
}

impl fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineOutcome::Resolved { sets } => write!(f, "resolved ({} sets)", sets),
            LineOutcome::NotFound => write!(f, "not found"),
            LineOutcome::Failed { reason } => write!(f, "lookup failed: {}", reason),
        }
    }
}

/// Outcome of one decklist line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub line_number: usize,
    pub card: String,
    pub outcome: LineOutcome,
}

/// How many of the distinct cards in a run could be resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub cards: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl Coverage {
    pub fn record(&mut self, outcome: &LineOutcome) {
        self.cards += 1;
        match outcome {
            LineOutcome::Resolved { .. } => self.resolved += 1,
            LineOutcome::NotFound => self.not_found += 1,
            LineOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// True when cards were submitted but none of them resolved
    pub fn all_failed(&self) -> bool {
        self.cards > 0 && self.resolved == 0
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} cards resolved", self.resolved, self.cards)
    }
}
