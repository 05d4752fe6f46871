//! Per-set aggregation of a decklist's printing histories
//!
//! A card counts toward every distinct set it was ever printed in, but at most
//! once per set no matter how many printings share that set code.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{CardEntry, PrintRecord};

/// Distinct decklist cards that were printed in one set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetAggregate {
    set_code: String,
    set_name: String,
    count: usize,
    cards: Vec<CardEntry>,
}

impl SetAggregate {
    fn new(set_code: &str, set_name: &str) -> Self {
        Self {
            set_code: set_code.to_string(),
            set_name: set_name.to_string(),
            count: 0,
            cards: Vec::new(),
        }
    }

    pub fn set_code(&self) -> &str {
        &self.set_code
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    /// Always equal to `cards().len()`
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn cards(&self) -> &[CardEntry] {
        &self.cards
    }

    pub fn contains(&self, card_name: &str) -> bool {
        self.cards.iter().any(|c| c.name == card_name)
    }

    /// Returns false when the card was already a member
    fn insert(&mut self, entry: CardEntry) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.cards.push(entry);
        self.count = self.cards.len();
        true
    }
}

/// Folds resolved cards into per-set aggregates
#[derive(Debug, Default, Clone)]
pub struct SetAggregator {
    sets: HashMap<String, SetAggregate>,
}

impl SetAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one card with its full printing history.
    ///
    /// Folding the same card again is a no-op.
    pub fn add_card(&mut self, card_name: &str, prints: &[PrintRecord]) {
        let mut seen = HashSet::new();
        for print in prints {
            if !seen.insert(print.set_code.as_str()) {
                continue;
            }

            let aggregate = self
                .sets
                .entry(print.set_code.clone())
                .or_insert_with(|| SetAggregate::new(&print.set_code, &print.set_name));

            let added = aggregate.insert(CardEntry {
                name: card_name.to_string(),
                image_url: print.image_url.clone(),
            });
            if added {
                log::trace!("{} counted for set {}", card_name, print.set_code);
            }
        }
    }

    pub fn get(&self, set_code: &str) -> Option<&SetAggregate> {
        self.sets.get(set_code)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &HashMap<String, SetAggregate> {
        &self.sets
    }

    pub fn into_sets(self) -> HashMap<String, SetAggregate> {
        self.sets
    }
}
