use crate::engine::RunReport;
use crate::models::CardEntry;

fn push_cards(output: &mut String, cards: &[CardEntry]) {
    for card in cards {
        match &card.image_url {
            Some(url) => output.push_str(&format!("    {} <{}>\n", card.name, url)),
            None => output.push_str(&format!("    {}\n", card.name)),
        }
    }
}

/// Plain-text rendering of a run: exclusive cards, set counts, then coverage
pub fn format_report(report: &RunReport, show_cards: bool) -> String {
    let mut output = String::new();

    output.push_str("Exclusive Cards:\n");
    if report.exclusives.is_empty() {
        output.push_str("  (none)\n");
    }
    for group in &report.exclusives {
        output.push_str(&format!("  {} ({}):\n", group.set_name, group.set_code));
        push_cards(&mut output, &group.cards);
    }
    output.push('\n');

    output.push_str("Set Counts:\n");
    if report.sets.is_empty() {
        output.push_str("  (none)\n");
    }
    for set in &report.sets {
        output.push_str(&format!(
            "  {} ({}): {}\n",
            set.set_name(),
            set.set_code(),
            set.count()
        ));
        if show_cards {
            push_cards(&mut output, set.cards());
        }
    }
    output.push('\n');

    output.push_str("========================\n");
    output.push_str(&format!("{}\n", report.coverage));

    let unresolved: Vec<_> = report.unresolved().collect();
    if !unresolved.is_empty() {
        output.push_str("Unresolved lines:\n");
        for line in unresolved {
            output.push_str(&format!(
                "  line {}: {} - {}\n",
                line.line_number, line.card, line.outcome
            ));
        }
    }
    if report.coverage.all_failed() {
        output.push_str("WARNING: No card could be looked up, results are empty.\n");
    }

    output
}
