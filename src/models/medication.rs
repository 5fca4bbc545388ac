use serde::{Deserialize, Serialize};

use super::enums::InteractionSeverity;

/// One medication line from a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dose: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Medication {
    pub fn new(name: &str, dose: &str, frequency: &str) -> Self {
        Self {
            name: name.into(),
            dose: dose.into(),
            frequency: frequency.into(),
            instructions: None,
        }
    }

    /// Trimmed, lowercased name used for every comparison.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Knowledge-base entry for an unordered drug pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugInteractionRecord {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: InteractionSeverity,
    pub description: String,
    #[serde(default)]
    pub mechanism: Option<String>,
    #[serde(default)]
    pub clinical_management: Option<String>,
}

impl DrugInteractionRecord {
    /// Case-insensitive, order-independent pair match.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();
        let x = self.drug_a.trim().to_lowercase();
        let y = self.drug_b.trim().to_lowercase();
        (x == a && y == b) || (x == b && y == a)
    }
}
