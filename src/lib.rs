//! Set Counter - which sets hold the cards of a decklist
//!
//! Takes a pasted decklist, looks up every card's printing history and reports
//! how many of the listed cards each set contains, plus the cards that were
//! only ever printed in a single set.

pub mod aggregation;
pub mod config;
pub mod decklist;
pub mod engine;
pub mod error;
pub mod exclusivity;
pub mod formatters;
pub mod io;
pub mod models;
pub mod ranking;
pub mod resolver;
pub mod scryfall;
pub mod session;
pub mod web;

// Re-export commonly used items
pub use aggregation::{SetAggregate, SetAggregator};
pub use config::{EngineConfig, ScryfallConfig};
pub use decklist::{card_lines, parse_decklist, ParsedLine, SkipReason};
pub use engine::{build_report, Engine, Resolution, RunReport, Tally};
pub use error::{Error, Result};
pub use exclusivity::{ExclusiveGroup, ExclusivityClassifier};
pub use formatters::format_report;
pub use models::{
    CardEntry, Coverage, DecklistLine, LineOutcome, LineReport, PrintRecord, ResolvedCard,
};
pub use ranking::rank_sets;
pub use resolver::{InMemoryResolver, LookupError, PrintResolver};
pub use scryfall::ScryfallClient;
pub use session::{RunCoordinator, RunTicket};
