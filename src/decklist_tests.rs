//! Tests for decklist parsing

use super::*;

fn names(text: &str) -> Vec<String> {
    card_lines(text).into_iter().map(|l| l.name).collect()
}

// ── quantity handling ────────────────────────────────────────────────

#[test]
fn test_strips_quantity_prefix() {
    let lines = card_lines("3 Lightning Bolt");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Lightning Bolt");
    assert_eq!(lines[0].quantity, Some(3));
    assert_eq!(lines[0].line_number, 1);
}

#[test]
fn test_name_without_quantity_is_unchanged() {
    let lines = card_lines("Lightning Bolt");
    assert_eq!(lines[0].name, "Lightning Bolt");
    assert_eq!(lines[0].quantity, None);
}

#[test]
fn test_quantity_with_tab_and_extra_spaces() {
    assert_eq!(names("12\t  Counterspell  "), vec!["Counterspell"]);
}

#[test]
fn test_quantity_only_line_is_skipped() {
    assert_eq!(
        parse_line(1, "4 "),
        ParsedLine::Skipped {
            line_number: 1,
            raw: "4 ".to_string(),
            reason: SkipReason::QuantityOnly,
        }
    );
}

#[test]
fn test_numeric_line_is_skipped() {
    assert!(names("42").is_empty());
    assert!(names("4 20").is_empty());
}

#[test]
fn test_quantity_glued_to_letter_is_part_of_name() {
    assert_eq!(names("4x Brainstorm"), vec!["4x Brainstorm"]);
}

#[test]
fn test_leading_number_followed_by_space_is_a_quantity() {
    // Needs an explicit quantity to keep a number that starts the name
    assert_eq!(names("1996 World Champion"), vec!["World Champion"]);
    assert_eq!(names("1 1996 World Champion"), vec!["1996 World Champion"]);
}

// ── filtering ────────────────────────────────────────────────────────

#[test]
fn test_blank_lines_are_skipped() {
    let parsed = parse_decklist("\n   \nPonder\n");
    assert_eq!(parsed.len(), 3);
    assert!(matches!(
        parsed[0],
        ParsedLine::Skipped {
            reason: SkipReason::Blank,
            ..
        }
    ));
    assert_eq!(names("\n   \nPonder\n"), vec!["Ponder"]);
}

#[test]
fn test_basic_lands_are_skipped() {
    let text = "1 Forest\n2 Island\nMountain\n20 Plains\nSwamp\n1 Ponder";
    assert_eq!(names(text), vec!["Ponder"]);

    let skipped = parse_decklist(text)
        .into_iter()
        .filter(|p| {
            matches!(
                p,
                ParsedLine::Skipped {
                    reason: SkipReason::BasicLand,
                    ..
                }
            )
        })
        .count();
    assert_eq!(skipped, 5);
}

#[test]
fn test_basic_land_match_is_exact() {
    assert!(is_basic_land("Forest"));
    assert!(!is_basic_land("forest"));
    assert!(!is_basic_land("Snow-Covered Forest"));
    assert_eq!(names("Snow-Covered Forest"), vec!["Snow-Covered Forest"]);
}

#[test]
fn test_section_headers_are_skipped() {
    let text = "Deck\n4 Brainstorm\n\nSideboard:\n2 Pyroblast";
    assert_eq!(names(text), vec!["Brainstorm", "Pyroblast"]);
    assert_eq!(
        parse_line(1, "SIDEBOARD"),
        ParsedLine::Skipped {
            line_number: 1,
            raw: "SIDEBOARD".to_string(),
            reason: SkipReason::SectionHeader,
        }
    );
}

// ── ordering ─────────────────────────────────────────────────────────

#[test]
fn test_duplicates_are_preserved_in_order() {
    let lines = card_lines("1 Brainstorm\n1 Ponder\n3 Brainstorm");
    let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Brainstorm", "Ponder", "Brainstorm"]);
    assert_eq!(lines[2].line_number, 3);
    assert_eq!(lines[2].quantity, Some(3));
}

#[test]
fn test_windows_line_endings() {
    assert_eq!(names("1 Brainstorm\r\n1 Ponder\r\n"), vec!["Brainstorm", "Ponder"]);
}
