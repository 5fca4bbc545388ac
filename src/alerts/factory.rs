use std::cmp::Ordering;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::{Alert, Finding};

/// Wraps findings into patient alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertFactory;

impl AlertFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn to_alert(&self, finding: Finding, patient_id: i64) -> Alert {
        self.to_alert_at(finding, patient_id, chrono::Local::now().naive_local())
    }

    /// Severity and kind carry over unchanged; priority comes from severity.
    pub fn to_alert_at(
        &self,
        finding: Finding,
        patient_id: i64,
        generated_at: NaiveDateTime,
    ) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            patient_id,
            generated_at,
            priority_score: finding.severity.priority_score(),
            severity: finding.severity,
            alert_type: finding.kind,
            title: finding.title,
            message: finding.message,
            recommendation: finding.recommendation,
            metadata: finding.metadata,
            acknowledged: false,
            acknowledged_at: None,
            acknowledged_by: None,
            resolved: false,
            resolved_at: None,
        }
    }

    pub fn to_alerts_at(
        &self,
        findings: Vec<Finding>,
        patient_id: i64,
        generated_at: NaiveDateTime,
    ) -> Vec<Alert> {
        findings
            .into_iter()
            .map(|f| self.to_alert_at(f, patient_id, generated_at))
            .collect()
    }
}

/// Higher priority first; most recent first among equal priorities.
pub fn compare_alerts(a: &Alert, b: &Alert) -> Ordering {
    b.priority_score
        .cmp(&a.priority_score)
        .then_with(|| b.generated_at.cmp(&a.generated_at))
}

pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(compare_alerts);
}
