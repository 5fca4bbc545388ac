use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{FindingKind, Severity};
use super::finding::Metadata;

/// A finding bound to a patient. Only the acknowledgement and resolution
/// fields ever change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub patient_id: i64,
    pub generated_at: NaiveDateTime,
    pub severity: Severity,
    pub alert_type: FindingKind,
    pub title: String,
    pub message: String,
    pub recommendation: Option<String>,
    pub metadata: Metadata,
    pub acknowledged: bool,
    pub acknowledged_at: Option<NaiveDateTime>,
    pub acknowledged_by: Option<i64>,
    pub resolved: bool,
    pub resolved_at: Option<NaiveDateTime>,
    pub priority_score: i32,
}
