use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::models::{DrugInteractionRecord, InteractionSeverity};

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Interaction store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Interaction store unavailable: {0}")]
    Unavailable(String),

    #[error("Lock poisoned")]
    LockFailed,

    #[error("Interaction data {0} could not be read: {1}")]
    Read(String, String),

    #[error("Interaction data {0} could not be parsed: {1}")]
    Parse(String, String),
}

/// Read-only source of drug interaction records.
///
/// Lookups are case-insensitive and order-independent: `find(a, b)` and
/// `find(b, a)` return the same record.
pub trait InteractionKnowledgeBase: Send + Sync {
    fn find(
        &self,
        drug_a: &str,
        drug_b: &str,
    ) -> Result<Option<DrugInteractionRecord>, KnowledgeBaseError>;
}

/// In-memory interaction table.
#[derive(Debug, Clone, Default)]
pub struct InteractionTable {
    records: Vec<DrugInteractionRecord>,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DrugInteractionRecord>) -> Self {
        Self { records }
    }

    pub fn insert(&mut self, record: DrugInteractionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DrugInteractionRecord] {
        &self.records
    }

    /// Build a table from a JSON array of loosely-shaped rows.
    /// See [`records_from_rows`] for the accepted shape.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeBaseError> {
        let rows: Vec<Value> = serde_json::from_str(json)
            .map_err(|e| KnowledgeBaseError::Parse("<inline>".into(), e.to_string()))?;
        Ok(Self::from_records(records_from_rows(&rows)))
    }

    pub fn load_json(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KnowledgeBaseError::Read(path.display().to_string(), e.to_string())
        })?;
        let rows: Vec<Value> = serde_json::from_str(&json).map_err(|e| {
            KnowledgeBaseError::Parse(path.display().to_string(), e.to_string())
        })?;
        let records = records_from_rows(&rows);

        tracing::info!(
            path = %path.display(),
            rows = rows.len(),
            imported = records.len(),
            "Loaded drug interaction table"
        );

        Ok(Self::from_records(records))
    }
}

impl InteractionKnowledgeBase for InteractionTable {
    fn find(
        &self,
        drug_a: &str,
        drug_b: &str,
    ) -> Result<Option<DrugInteractionRecord>, KnowledgeBaseError> {
        Ok(self.records.iter().find(|r| r.matches(drug_a, drug_b)).cloned())
    }
}

/// Convert loose import rows into records.
///
/// Accepts `drug_a`/`a`, `drug_b`/`b`, `description`/`desc`, `severity`,
/// `mechanism` and `clinical_management`/`management`. Text fields are
/// trimmed and blank optionals become `None`. Rows without both drug
/// names and a description are skipped.
pub fn records_from_rows(rows: &[Value]) -> Vec<DrugInteractionRecord> {
    rows.iter().filter_map(record_from_row).collect()
}

fn record_from_row(row: &Value) -> Option<DrugInteractionRecord> {
    let drug_a = text(row, &["drug_a", "a"])?;
    let drug_b = text(row, &["drug_b", "b"])?;
    let description = text(row, &["description", "desc"])?;

    Some(DrugInteractionRecord {
        drug_a,
        drug_b,
        severity: InteractionSeverity::normalize(row.get("severity").and_then(Value::as_str)),
        description,
        mechanism: text(row, &["mechanism"]),
        clinical_management: text(row, &["clinical_management", "management"]),
    })
}

/// First non-blank string among `keys`, trimmed.
fn text(row: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| row.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn warfarin_aspirin() -> DrugInteractionRecord {
        DrugInteractionRecord {
            drug_a: "aspirin".into(),
            drug_b: "warfarin".into(),
            severity: InteractionSeverity::Major,
            description: "Increased bleeding risk".into(),
            mechanism: Some("Additive anticoagulant effect".into()),
            clinical_management: None,
        }
    }

    #[test]
    fn table_lookup_is_symmetric_and_case_insensitive() {
        let table = InteractionTable::from_records(vec![warfarin_aspirin()]);
        assert!(table.find("Warfarin", "ASPIRIN").unwrap().is_some());
        assert!(table.find("aspirin", "warfarin").unwrap().is_some());
        assert!(table.find("aspirin", "ibuprofen").unwrap().is_none());
    }

    #[test]
    fn loose_rows_use_aliases_and_normalise_severity() {
        let table = InteractionTable::from_json_str(
            r#"[
                {"a": " Simvastatin ", "b": "clarithromycin", "desc": "Myopathy risk", "severity": "contra"},
                {"drug_a": "lisinopril", "drug_b": "spironolactone", "description": "Hyperkalaemia", "management": "Monitor potassium"}
            ]"#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.drug_a, "Simvastatin");
        assert_eq!(first.severity, InteractionSeverity::Contraindicated);

        let second = &table.records()[1];
        assert_eq!(second.severity, InteractionSeverity::Moderate);
        assert_eq!(second.clinical_management.as_deref(), Some("Monitor potassium"));
        assert_eq!(second.mechanism, None);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let table = InteractionTable::from_json_str(
            r#"[
                {"drug_a": "aspirin", "description": "missing b"},
                {"drug_a": "aspirin", "drug_b": "warfarin", "description": "   "},
                {"drug_a": "aspirin", "drug_b": "warfarin", "description": "Bleeding", "severity": "high"}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].severity, InteractionSeverity::Major);
    }

    #[test]
    fn load_json_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"drug_a": "aspirin", "drug_b": "warfarin", "description": "Bleeding", "severity": "major"}}]"#
        )
        .unwrap();

        let table = InteractionTable::load_json(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn load_json_reports_missing_and_malformed_files() {
        let missing = InteractionTable::load_json(Path::new("/nonexistent/interactions.json"));
        assert!(matches!(missing, Err(KnowledgeBaseError::Read(_, _))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let malformed = InteractionTable::load_json(file.path());
        assert!(matches!(malformed, Err(KnowledgeBaseError::Parse(_, _))));
    }
}
