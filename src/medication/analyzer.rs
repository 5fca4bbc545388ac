use std::time::Instant;

use crate::helpers::capitalize;
use crate::models::{Finding, FindingKind, FlagSeverity, Medication, MedicationFindingKind};

use super::knowledge::InteractionKnowledgeBase;
use super::rules::{check_dosage_rules, check_duplicates};
use super::types::{Flag, InteractionEntry, MedicationAnalysis, MedicationError, MedicationFinding};

const ALL_CLEAR: &str = "All medications look within expected ranges.";

/// Interaction, dosage and duplicate checks over a medication list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicationSafetyAnalyzer;

impl MedicationSafetyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a medication list. Fails only when the knowledge base does;
    /// a partial interaction list is never returned.
    pub fn analyze(
        &self,
        medications: &[Medication],
        knowledge_base: &dyn InteractionKnowledgeBase,
    ) -> Result<MedicationAnalysis, MedicationError> {
        let start = Instant::now();

        let interactions = check_interactions(medications, knowledge_base).inspect_err(|e| {
            tracing::warn!(error = %e, "Interaction lookup failed");
        })?;
        let mut findings = check_dosage_rules(medications);
        findings.extend(check_duplicates(medications));

        let summary = summarize(&interactions, &findings);
        let flags = build_flags(&interactions, &findings);

        tracing::info!(
            medications = medications.len(),
            interactions = interactions.len(),
            findings = findings.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Medication safety analysis complete"
        );

        Ok(MedicationAnalysis {
            summary,
            interactions,
            findings,
            flags,
        })
    }

    /// Project an analysis onto alert findings: interactions first, then
    /// dosage, frequency and duplicate findings.
    pub fn to_findings(&self, analysis: &MedicationAnalysis) -> Vec<Finding> {
        let interactions = analysis.interactions.iter().map(|it| {
            let mut finding = Finding::new(
                it.severity.finding_severity(),
                FindingKind::DrugInteraction,
                format!("Drug Interaction: {} + {}", it.drug_a, it.drug_b),
                it.description.clone(),
            )
            .with_meta("drug_a", it.drug_a.as_str())
            .with_meta("drug_b", it.drug_b.as_str())
            .with_meta("interaction_severity", it.severity.as_str());
            if let Some(management) = &it.management {
                finding = finding.with_recommendation(management.as_str());
            }
            if let Some(mechanism) = &it.mechanism {
                finding = finding.with_meta("mechanism", mechanism.as_str());
            }
            finding
        });

        let adherence = analysis.findings.iter().map(|f| {
            Finding::new(
                f.severity.finding_severity(),
                FindingKind::MedicationAdherence,
                medication_finding_title(f.kind),
                f.message.clone(),
            )
            .with_meta("drug", f.drug.as_str())
            .with_meta("finding_type", f.kind.as_str())
            .with_meta("flag_severity", f.severity.as_str())
        });

        interactions.chain(adherence).collect()
    }
}

fn medication_finding_title(kind: MedicationFindingKind) -> &'static str {
    match kind {
        MedicationFindingKind::Dose => "Dose Review",
        MedicationFindingKind::Frequency => "Dosing Frequency Review",
        MedicationFindingKind::Duplicate => "Duplicate Medication",
    }
}

/// Distinct medication names, case-insensitive, in order of first
/// appearance. The spelling kept for each is the last one seen.
fn unique_names(medications: &[Medication]) -> Vec<String> {
    let mut unique: Vec<(String, String)> = Vec::new();
    for med in medications {
        let name = med.name.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        match unique.iter_mut().find(|(k, _)| *k == key) {
            Some((_, spelling)) => *spelling = name.to_string(),
            None => unique.push((key, name.to_string())),
        }
    }
    unique.into_iter().map(|(_, spelling)| spelling).collect()
}

/// Query the knowledge base for every unordered pair of distinct names.
fn check_interactions(
    medications: &[Medication],
    knowledge_base: &dyn InteractionKnowledgeBase,
) -> Result<Vec<InteractionEntry>, MedicationError> {
    let names = unique_names(medications);
    let mut interactions = Vec::new();

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if let Some(record) = knowledge_base.find(a, b)? {
                interactions.push(InteractionEntry {
                    drug_a: a.clone(),
                    drug_b: b.clone(),
                    severity: record.severity,
                    description: record.description,
                    mechanism: record.mechanism,
                    management: record.clinical_management,
                });
            }
        }
    }

    Ok(interactions)
}

fn summarize(interactions: &[InteractionEntry], findings: &[MedicationFinding]) -> String {
    let mut issues = Vec::new();
    if !interactions.is_empty() {
        issues.push(format!(
            "{} potential drug interaction(s) detected",
            interactions.len()
        ));
    }
    if findings.iter().any(|f| f.severity == FlagSeverity::Medium) {
        issues.push("dosage/frequency review recommended".to_string());
    }
    if findings
        .iter()
        .any(|f| f.kind == MedicationFindingKind::Duplicate)
    {
        issues.push("duplicate entries found".to_string());
    }

    if issues.is_empty() {
        ALL_CLEAR.to_string()
    } else {
        format!("{}.", capitalize(&issues.join("; ")))
    }
}

fn build_flags(interactions: &[InteractionEntry], findings: &[MedicationFinding]) -> Vec<Flag> {
    let interaction_flags = interactions.iter().map(|it| Flag {
        severity: it.severity.flag_severity(),
        message: format!("Interaction: {} + {} — {}", it.drug_a, it.drug_b, it.description),
    });
    let finding_flags = findings.iter().map(|f| Flag {
        severity: f.severity,
        message: f.message.clone(),
    });
    interaction_flags.chain(finding_flags).collect()
}
