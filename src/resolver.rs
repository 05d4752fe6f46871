//! Print history lookup
//!
//! The engine only talks to [`PrintResolver`]; the Scryfall client and the
//! in-memory fixture resolver both implement it.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{PrintRecord, ResolvedCard};

/// Errors from a single card lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// No card with this exact name exists
    #[error("Card not found: {name}")]
    NotFound { name: String },
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// API returned an error object
    #[error("{code}: {details}")]
    Api { code: String, details: String },
    /// Lookup did not finish in time
    #[error("Lookup timed out after {after:?}")]
    Timeout { after: Duration },
}

impl LookupError {
    /// `NotFound` is the only kind that means the name itself is unknown;
    /// everything else is a failed lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Resolves a card name to its full printing history
#[async_trait]
pub trait PrintResolver: Send + Sync {
    /// Returns the card's canonical name and every printing, in the order the
    /// source reports them. Names that differ only in case resolve to the same
    /// canonical name.
    async fn resolve(&self, card_name: &str) -> Result<ResolvedCard, LookupError>;
}

/// Resolver backed by a fixed name → prints map
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct InMemoryResolver {
    cards: HashMap<String, Vec<PrintRecord>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, name: &str, prints: Vec<PrintRecord>) -> Self {
        self.insert(name, prints);
        self
    }

    pub fn insert(&mut self, name: &str, prints: Vec<PrintRecord>) {
        self.cards.insert(name.to_string(), prints);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[async_trait]
impl PrintResolver for InMemoryResolver {
    async fn resolve(&self, card_name: &str) -> Result<ResolvedCard, LookupError> {
        let entry = self.cards.get_key_value(card_name).or_else(|| {
            self.cards
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(card_name))
        });

        match entry {
            Some((name, prints)) => Ok(ResolvedCard::new(name, prints.clone())),
            None => Err(LookupError::NotFound {
                name: card_name.to_string(),
            }),
        }
    }
}
