//! Decklist run pipeline
//!
//! parse → resolve each distinct card (bounded concurrency, per-card timeout)
//! → fold into set aggregates and exclusive groups → ranked report.
//!
//! Lookups run out of order, but their results are put back in input order
//! before folding, so the report does not depend on which lookup happened to
//! finish first. Folding runs on the calling task only after every lookup has
//! completed.
//!
//! A card is identified by its canonical name as the resolver reports it.
//! Decklist spellings that differ only in case are looked up once.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::aggregation::{SetAggregate, SetAggregator};
use crate::config::EngineConfig;
use crate::decklist;
use crate::error::{Error, Result};
use crate::exclusivity::{ExclusiveGroup, ExclusivityClassifier};
use crate::models::{
    Coverage, DecklistLine, LineOutcome, LineReport, PrintRecord, ResolvedCard,
};
use crate::ranking::rank_sets;
use crate::resolver::{LookupError, PrintResolver};
use crate::session::RunTicket;

/// Lookup result for one distinct card
#[derive(Debug)]
pub struct Resolution {
    /// Name as it was looked up
    pub card: String,
    pub result: std::result::Result<ResolvedCard, LookupError>,
}

impl Resolution {
    /// Successful lookup whose canonical name is the looked-up name
    pub fn resolved(card: &str, prints: Vec<PrintRecord>) -> Self {
        Self::resolved_as(card, card, prints)
    }

    pub fn resolved_as(card: &str, canonical: &str, prints: Vec<PrintRecord>) -> Self {
        Self {
            card: card.to_string(),
            result: Ok(ResolvedCard::new(canonical, prints)),
        }
    }

    pub fn failed(card: &str, error: LookupError) -> Self {
        Self {
            card: card.to_string(),
            result: Err(error),
        }
    }
}

/// Set aggregator and exclusivity classifier fed from the same records
#[derive(Debug, Default, Clone)]
pub struct Tally {
    pub aggregator: SetAggregator,
    pub classifier: ExclusivityClassifier,
}

impl Tally {
    pub fn add_card(&mut self, card_name: &str, prints: &[PrintRecord]) {
        self.aggregator.add_card(card_name, prints);
        self.classifier.add_card(card_name, prints);
    }

    /// Fold every successful resolution; failed lookups contribute nothing
    pub fn from_resolutions(resolutions: &[Resolution]) -> Self {
        let mut tally = Self::default();
        for resolution in resolutions {
            if let Ok(resolved) = &resolution.result {
                tally.add_card(&resolved.name, &resolved.prints);
            }
        }
        tally
    }

    pub fn ranked_sets(&self) -> Vec<SetAggregate> {
        rank_sets(self.aggregator.sets())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn exclusive_groups(&self) -> Vec<ExclusiveGroup> {
        self.classifier.classify().into_values().collect()
    }
}

/// Everything a presentation layer needs from one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// One entry per card line, in input order
    pub lines: Vec<LineReport>,
    /// Sets by card count, descending
    pub sets: Vec<SetAggregate>,
    /// Exclusive cards grouped by set, ordered by set code
    pub exclusives: Vec<ExclusiveGroup>,
    /// Counted over distinct cards, not lines
    pub coverage: Coverage,
}

impl RunReport {
    pub fn set(&self, set_code: &str) -> Option<&SetAggregate> {
        self.sets.iter().find(|s| s.set_code() == set_code)
    }

    pub fn exclusive_group(&self, set_code: &str) -> Option<&ExclusiveGroup> {
        self.exclusives.iter().find(|g| g.set_code == set_code)
    }

    /// Lines whose card could not be resolved
    pub fn unresolved(&self) -> impl Iterator<Item = &LineReport> {
        self.lines.iter().filter(|l| !l.outcome.is_resolved())
    }
}

fn outcome_for(resolution: &Resolution, tally: &Tally) -> LineOutcome {
    match &resolution.result {
        Ok(resolved) => LineOutcome::Resolved {
            sets: tally.classifier.distinct_sets(&resolved.name),
        },
        Err(e) if e.is_not_found() => LineOutcome::NotFound,
        Err(e) => LineOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

/// Build the report for already resolved cards.
///
/// Pure: the same lines and resolutions always give the same report.
pub fn build_report(lines: &[DecklistLine], resolutions: &[Resolution]) -> RunReport {
    let tally = Tally::from_resolutions(resolutions);

    let mut coverage = Coverage::default();
    let mut outcomes: HashMap<String, LineOutcome> = HashMap::new();
    for resolution in resolutions {
        let key = lookup_key(&resolution.card);
        if outcomes.contains_key(&key) {
            continue;
        }
        let outcome = outcome_for(resolution, &tally);
        coverage.record(&outcome);
        outcomes.insert(key, outcome);
    }

    let lines = lines
        .iter()
        .map(|line| LineReport {
            line_number: line.line_number,
            card: line.name.clone(),
            outcome: outcomes
                .get(&lookup_key(&line.name))
                .cloned()
                .unwrap_or(LineOutcome::Failed {
                    reason: "not looked up".to_string(),
                }),
        })
        .collect();

    RunReport {
        lines,
        sets: tally.ranked_sets(),
        exclusives: tally.exclusive_groups(),
        coverage,
    }
}

/// Card names are matched case-insensitively, as the resolvers do
fn lookup_key(name: &str) -> String {
    name.to_lowercase()
}

/// Distinct card names in first-seen order, keeping the first spelling
fn distinct_names(lines: &[DecklistLine]) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .filter(|line| seen.insert(lookup_key(&line.name)))
        .map(|line| line.name.clone())
        .collect()
}

/// Runs decklists against a print resolver
#[derive(Clone)]
pub struct Engine {
    resolver: Arc<dyn PrintResolver>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(resolver: Arc<dyn PrintResolver>, config: EngineConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve every name, at most `concurrency` at a time.
    ///
    /// A slot is refilled as soon as any lookup finishes. Results come back in
    /// the order of `names`.
    pub async fn resolve_all(&self, names: Vec<String>) -> Vec<Resolution> {
        let timeout = self.config.lookup_timeout;
        let concurrency = self.config.concurrency.max(1);

        let mut resolutions: Vec<(usize, Resolution)> = stream::iter(names.into_iter().enumerate())
            .map(|(index, card)| {
                let resolver = Arc::clone(&self.resolver);
                async move {
                    let result = match tokio::time::timeout(timeout, resolver.resolve(&card)).await
                    {
                        Ok(result) => result,
                        Err(_) => Err(LookupError::Timeout { after: timeout }),
                    };

                    match &result {
                        Ok(resolved) => log::debug!(
                            "{}: {} printings as {}",
                            card,
                            resolved.prints.len(),
                            resolved.name
                        ),
                        Err(e) if e.is_not_found() => log::warn!("{}: not found", card),
                        Err(e) => log::warn!("{}: lookup failed: {}", card, e),
                    }
                    (index, Resolution { card, result })
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        resolutions.sort_by_key(|(index, _)| *index);
        resolutions
            .into_iter()
            .map(|(_, resolution)| resolution)
            .collect()
    }

    /// Run a decklist to completion
    pub async fn run(&self, decklist_text: &str) -> RunReport {
        let lines = decklist::card_lines(decklist_text);
        let names = distinct_names(&lines);
        log::info!(
            "Resolving {} distinct cards from {} card lines",
            names.len(),
            lines.len()
        );

        let resolutions = self.resolve_all(names).await;
        let report = build_report(&lines, &resolutions);
        log_summary(&report);
        report
    }

    /// Run a decklist unless a newer run starts first.
    ///
    /// When the ticket is superseded, outstanding lookups are dropped and
    /// [`Error::Superseded`] is returned instead of a report.
    pub async fn run_with_ticket(
        &self,
        decklist_text: &str,
        mut ticket: RunTicket,
    ) -> Result<RunReport> {
        let generation = ticket.generation();
        let lines = decklist::card_lines(decklist_text);
        let names = distinct_names(&lines);
        log::info!(
            "Run {}: resolving {} distinct cards from {} card lines",
            generation,
            names.len(),
            lines.len()
        );

        let resolutions = tokio::select! {
            resolutions = self.resolve_all(names) => resolutions,
            _ = ticket.superseded() => {
                log::info!("Run {} superseded, dropping in-flight lookups", generation);
                return Err(Error::Superseded { generation });
            }
        };

        if !ticket.is_current() {
            log::info!("Run {} finished after being superseded, discarding", generation);
            return Err(Error::Superseded { generation });
        }

        let report = build_report(&lines, &resolutions);
        log_summary(&report);
        Ok(report)
    }
}

fn log_summary(report: &RunReport) {
    log::info!(
        "Run finished: {}, {} sets, {} exclusive cards",
        report.coverage,
        report.sets.len(),
        report
            .exclusives
            .iter()
            .map(|g| g.cards.len())
            .sum::<usize>()
    );
    if report.coverage.all_failed() {
        log::warn!("None of the {} cards could be resolved", report.coverage.cards);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
