//! Exclusive card detection
//!
//! A card is exclusive when every one of its printings belongs to the same
//! set. Membership is tracked as a set of distinct set codes per card, so
//! several printings inside one set still count as a single set.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{CardEntry, PrintRecord};

/// Cards whose whole printing history lies in one set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusiveGroup {
    pub set_code: String,
    pub set_name: String,
    pub cards: Vec<CardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SetSighting {
    set_name: String,
    image_url: Option<String>,
}

/// Distinct sets each card was seen in, keyed by set code
type Membership = BTreeMap<String, SetSighting>;

#[derive(Debug, Default, Clone)]
pub struct ExclusivityClassifier {
    memberships: HashMap<String, Membership>,
    /// Card names in first-seen order
    order: Vec<String>,
}

impl ExclusivityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a card's printings. Cards with no printings are ignored.
    pub fn add_card(&mut self, card_name: &str, prints: &[PrintRecord]) {
        if prints.is_empty() {
            return;
        }

        if !self.memberships.contains_key(card_name) {
            self.order.push(card_name.to_string());
        }
        let membership = self.memberships.entry(card_name.to_string()).or_default();

        for print in prints {
            membership
                .entry(print.set_code.clone())
                .or_insert_with(|| SetSighting {
                    set_name: print.set_name.clone(),
                    image_url: print.image_url.clone(),
                });
        }
    }

    /// Number of distinct sets the card was printed in (0 if never seen)
    pub fn distinct_sets(&self, card_name: &str) -> usize {
        self.memberships.get(card_name).map_or(0, BTreeMap::len)
    }

    pub fn is_exclusive(&self, card_name: &str) -> bool {
        self.distinct_sets(card_name) == 1
    }

    /// Group exclusive cards by their only set, ordered by set code
    pub fn classify(&self) -> BTreeMap<String, ExclusiveGroup> {
        let mut groups: BTreeMap<String, ExclusiveGroup> = BTreeMap::new();

        for card_name in &self.order {
            let Some(membership) = self.memberships.get(card_name) else {
                continue;
            };
            if membership.len() != 1 {
                continue;
            }
            let Some((set_code, sighting)) = membership.iter().next() else {
                continue;
            };

            groups
                .entry(set_code.clone())
                .or_insert_with(|| ExclusiveGroup {
                    set_code: set_code.clone(),
                    set_name: sighting.set_name.clone(),
                    cards: Vec::new(),
                })
                .cards
                .push(CardEntry {
                    name: card_name.clone(),
                    image_url: sighting.image_url.clone(),
                });
        }

        groups
    }
}
