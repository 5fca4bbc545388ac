use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FlagSeverity, InteractionSeverity, MedicationFindingKind};

use super::knowledge::KnowledgeBaseError;

#[derive(Error, Debug)]
pub enum MedicationError {
    #[error("Interaction knowledge base failed: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),
}

/// A knowledge-base hit for one pair of prescribed drugs.
/// `drug_a`/`drug_b` keep the prescription's own spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: InteractionSeverity,
    pub description: String,
    pub mechanism: Option<String>,
    pub management: Option<String>,
}

/// Dose, frequency or duplicate issue raised by the heuristic rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationFinding {
    pub severity: FlagSeverity,
    pub kind: MedicationFindingKind,
    pub message: String,
    /// Normalised name of the medication the finding is about.
    pub drug: String,
}

/// Simplified projection persisted on a prescription record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub severity: FlagSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationAnalysis {
    pub summary: String,
    pub interactions: Vec<InteractionEntry>,
    pub findings: Vec<MedicationFinding>,
    /// Interaction flags first, then one per finding.
    pub flags: Vec<Flag>,
}
