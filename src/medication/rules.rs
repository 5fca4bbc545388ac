use crate::models::{FlagSeverity, Medication, MedicationFindingKind};

use super::types::MedicationFinding;

/// Lowercased view of a medication the rules match against.
pub struct RuleInput {
    pub name: String,
    pub dose: String,
    pub frequency: String,
}

impl RuleInput {
    pub fn from_medication(med: &Medication) -> Self {
        Self {
            name: med.normalized_name(),
            dose: med.dose.to_lowercase(),
            frequency: med.frequency.to_lowercase(),
        }
    }
}

/// A keyword heuristic over one medication.
pub struct DosageRule {
    pub id: &'static str,
    pub applies: fn(&RuleInput) -> bool,
    pub severity: FlagSeverity,
    pub kind: MedicationFindingKind,
    pub message: &'static str,
}

fn is_paracetamol(input: &RuleInput) -> bool {
    input.name.contains("paracetamol") || input.name.contains("acetaminophen")
}

/// Evaluated in order for each medication.
pub static DOSAGE_RULES: &[DosageRule] = &[
    DosageRule {
        id: "paracetamol_high_single_dose",
        applies: |m| is_paracetamol(m) && m.dose.contains("1000"),
        severity: FlagSeverity::Medium,
        kind: MedicationFindingKind::Dose,
        message: "High single dose of paracetamol (1000 mg). Review total daily dose.",
    },
    DosageRule {
        id: "paracetamol_650_frequent",
        applies: |m| {
            is_paracetamol(m)
                && m.dose.contains("650")
                && (m.frequency.contains("three") || m.frequency.contains("four"))
        },
        severity: FlagSeverity::Medium,
        kind: MedicationFindingKind::Frequency,
        message: "Paracetamol 650 mg taken ≥3 times daily may exceed safe limits.",
    },
    DosageRule {
        id: "amoxicillin_interval",
        applies: |m| {
            m.name.contains("amoxicillin")
                && !["twice", "three", "every 8"]
                    .iter()
                    .any(|w| m.frequency.contains(w))
        },
        severity: FlagSeverity::Low,
        kind: MedicationFindingKind::Frequency,
        message: "Amoxicillin frequency looks uncommon; verify dosing interval.",
    },
];

/// Run every dosage rule against every medication, medication-major order.
pub fn check_dosage_rules(medications: &[Medication]) -> Vec<MedicationFinding> {
    let mut findings = Vec::new();
    for med in medications {
        let input = RuleInput::from_medication(med);
        for rule in DOSAGE_RULES.iter().filter(|r| (r.applies)(&input)) {
            findings.push(MedicationFinding {
                severity: rule.severity,
                kind: rule.kind,
                message: rule.message.to_string(),
                drug: input.name.clone(),
            });
        }
    }
    findings
}

/// One low-severity finding per name that appears more than once,
/// ordered by first appearance. Blank names are ignored.
pub fn check_duplicates(medications: &[Medication]) -> Vec<MedicationFinding> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in medications.iter().map(Medication::normalized_name) {
        if name.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| MedicationFinding {
            severity: FlagSeverity::Low,
            kind: MedicationFindingKind::Duplicate,
            message: format!("Duplicate medication entries detected for '{name}'."),
            drug: name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_med(name: &str, dose: &str, frequency: &str) -> Medication {
        Medication::new(name, dose, frequency)
    }

    #[test]
    fn paracetamol_1000_is_a_dose_finding() {
        let findings = check_dosage_rules(&[make_med("Paracetamol", "1000 mg", "twice daily")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, MedicationFindingKind::Dose);
        assert_eq!(findings[0].severity, FlagSeverity::Medium);
        assert_eq!(findings[0].drug, "paracetamol");
    }

    #[test]
    fn acetaminophen_650_four_times() {
        let findings =
            check_dosage_rules(&[make_med("Acetaminophen ER", "650mg", "Four times a day")]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, MedicationFindingKind::Frequency);
        assert!(findings[0].message.starts_with("Paracetamol 650 mg"));
    }

    #[test]
    fn paracetamol_650_twice_is_fine() {
        assert!(check_dosage_rules(&[make_med("Paracetamol", "650 mg", "twice daily")]).is_empty());
    }

    #[test]
    fn amoxicillin_interval_check() {
        let odd = check_dosage_rules(&[make_med("Amoxicillin", "500 mg", "once daily")]);
        assert_eq!(odd.len(), 1);
        assert_eq!(odd[0].severity, FlagSeverity::Low);

        for freq in ["Twice daily", "three times a day", "every 8 hours"] {
            assert!(
                check_dosage_rules(&[make_med("amoxicillin", "500 mg", freq)]).is_empty(),
                "{freq} should be accepted"
            );
        }
    }

    #[test]
    fn findings_follow_medication_order() {
        let findings = check_dosage_rules(&[
            make_med("Amoxicillin", "250 mg", ""),
            make_med("Paracetamol", "1000 mg", ""),
        ]);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].drug, "amoxicillin");
        assert_eq!(findings[1].drug, "paracetamol");
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        let findings = check_duplicates(&[
            make_med("Metformin", "", ""),
            make_med("metformin", "", ""),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, FlagSeverity::Low);
        assert_eq!(
            findings[0].message,
            "Duplicate medication entries detected for 'metformin'."
        );
    }

    #[test]
    fn duplicates_ignore_blank_names_and_singletons() {
        let findings = check_duplicates(&[
            make_med("", "", ""),
            make_med("  ", "", ""),
            make_med("Aspirin", "", ""),
        ]);
        assert!(findings.is_empty());
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut ids: Vec<&str> = DOSAGE_RULES.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DOSAGE_RULES.len());
    }
}
