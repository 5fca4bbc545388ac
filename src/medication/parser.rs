//! Free-text prescription parser.
//!
//! Each non-blank line is tested against an ordered rule table; the first
//! matching rule decides what the line contributes. Lines that match no
//! rule, and detail lines seen before any medication has started, are
//! dropped without error.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Medication;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineAction {
    StartMedication,
    SetDose,
    SetFrequency,
    AppendInstruction,
}

struct LineRule {
    regex: Regex,
    action: LineAction,
}

/// Evaluated in order against the lowercased line.
static LINE_RULES: LazyLock<Vec<LineRule>> = LazyLock::new(|| {
    vec![
        rule(r"^(?:[1-5]\.|tab|cap|syr|inj)|tablet", LineAction::StartMedication),
        rule(r"mg|ml|strength", LineAction::SetDose),
        rule(r"once|twice|three|every|times a day|sos", LineAction::SetFrequency),
        rule(r"gargle|with|after meals|as needed", LineAction::AppendInstruction),
    ]
});

fn rule(pattern: &str, action: LineAction) -> LineRule {
    LineRule {
        regex: Regex::new(pattern).expect("Invalid prescription line pattern"),
        action,
    }
}

fn classify(line: &str) -> Option<LineAction> {
    let lower = line.to_lowercase();
    LINE_RULES
        .iter()
        .find(|r| r.regex.is_match(&lower))
        .map(|r| r.action)
}

/// Strip numbering ("1. ") and dosage-form prefixes ("Tab.") from a
/// medication header line.
fn medication_name(line: &str) -> String {
    line.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ' ')
        .replace("Tab.", "")
        .replace("Cap.", "")
        .replace("Syr.", "")
        .trim()
        .to_string()
}

/// Parse prescription text into medications, in order of appearance.
pub fn parse_prescription_text(text: &str) -> Vec<Medication> {
    let mut medications = Vec::new();
    let mut current: Option<Medication> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(action) = classify(line) else {
            continue;
        };

        if action == LineAction::StartMedication {
            medications.extend(current.take());
            current = Some(Medication {
                name: medication_name(line),
                ..Medication::default()
            });
            continue;
        }

        let Some(med) = current.as_mut() else {
            continue;
        };
        match action {
            LineAction::SetDose => med.dose = line.to_string(),
            LineAction::SetFrequency => med.frequency = line.to_string(),
            LineAction::AppendInstruction => {
                med.instructions = Some(match med.instructions.take() {
                    Some(existing) => format!("{existing} {line}"),
                    None => line.to_string(),
                });
            }
            LineAction::StartMedication => {}
        }
    }

    medications.extend(current);
    tracing::debug!(medications = medications.len(), "Parsed prescription text");
    medications
}
