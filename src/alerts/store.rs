use std::sync::RwLock;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Alert, Severity};

use super::factory::sort_alerts;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(Uuid),

    #[error("Lock poisoned")]
    LockFailed,
}

/// Listing filter; `None` fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFilter {
    pub patient_id: Option<i64>,
    pub severity: Option<Severity>,
    pub acknowledged: Option<bool>,
    pub resolved: Option<bool>,
}

impl AlertFilter {
    pub fn for_patient(patient_id: i64) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }

    fn matches(&self, alert: &Alert) -> bool {
        self.patient_id.map_or(true, |p| alert.patient_id == p)
            && self.severity.map_or(true, |s| alert.severity == s)
            && self.acknowledged.map_or(true, |a| alert.acknowledged == a)
            && self.resolved.map_or(true, |r| alert.resolved == r)
    }
}

/// In-memory, append-only alert store backed by RwLock.
/// Alerts are never removed; only acknowledgement and resolution change.
pub struct AlertStore {
    alerts: RwLock<Vec<Alert>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, alert: Alert) -> Result<(), AlertError> {
        let mut alerts = self.alerts.write().map_err(|_| AlertError::LockFailed)?;
        tracing::debug!(
            alert_id = %alert.id,
            patient_id = alert.patient_id,
            severity = alert.severity.as_str(),
            "Alert stored"
        );
        alerts.push(alert);
        Ok(())
    }

    pub fn insert_all(&self, batch: impl IntoIterator<Item = Alert>) -> Result<(), AlertError> {
        let mut alerts = self.alerts.write().map_err(|_| AlertError::LockFailed)?;
        alerts.extend(batch);
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> Result<Alert, AlertError> {
        let alerts = self.alerts.read().map_err(|_| AlertError::LockFailed)?;
        alerts
            .iter()
            .find(|a| a.id == *id)
            .cloned()
            .ok_or(AlertError::NotFound(*id))
    }

    pub fn len(&self) -> Result<usize, AlertError> {
        let alerts = self.alerts.read().map_err(|_| AlertError::LockFailed)?;
        Ok(alerts.len())
    }

    pub fn is_empty(&self) -> Result<bool, AlertError> {
        Ok(self.len()? == 0)
    }

    pub fn set_acknowledged(
        &self,
        id: &Uuid,
        acknowledged: bool,
        actor: i64,
    ) -> Result<Alert, AlertError> {
        self.set_acknowledged_at(id, acknowledged, actor, chrono::Local::now().naive_local())
    }

    /// Setting true stamps time and actor; setting false clears both.
    pub fn set_acknowledged_at(
        &self,
        id: &Uuid,
        acknowledged: bool,
        actor: i64,
        now: NaiveDateTime,
    ) -> Result<Alert, AlertError> {
        let mut alerts = self.alerts.write().map_err(|_| AlertError::LockFailed)?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or(AlertError::NotFound(*id))?;

        alert.acknowledged = acknowledged;
        alert.acknowledged_at = acknowledged.then_some(now);
        alert.acknowledged_by = acknowledged.then_some(actor);

        tracing::info!(alert_id = %id, acknowledged, actor, "Alert acknowledgement updated");
        Ok(alert.clone())
    }

    pub fn set_resolved(&self, id: &Uuid, resolved: bool) -> Result<Alert, AlertError> {
        self.set_resolved_at(id, resolved, chrono::Local::now().naive_local())
    }

    pub fn set_resolved_at(
        &self,
        id: &Uuid,
        resolved: bool,
        now: NaiveDateTime,
    ) -> Result<Alert, AlertError> {
        let mut alerts = self.alerts.write().map_err(|_| AlertError::LockFailed)?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or(AlertError::NotFound(*id))?;

        alert.resolved = resolved;
        alert.resolved_at = resolved.then_some(now);

        tracing::info!(alert_id = %id, resolved, "Alert resolution updated");
        Ok(alert.clone())
    }

    /// Matching alerts, highest priority first, newest first within a priority.
    pub fn list(&self, filter: &AlertFilter) -> Result<Vec<Alert>, AlertError> {
        let alerts = self.alerts.read().map_err(|_| AlertError::LockFailed)?;
        let mut result: Vec<Alert> = alerts.iter().filter(|a| filter.matches(a)).cloned().collect();
        sort_alerts(&mut result);
        Ok(result)
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}
