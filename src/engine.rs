use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alerts::{sort_alerts, AlertError, AlertFactory, AlertStore};
use crate::config::{ConfigError, EngineConfig};
use crate::medication::{
    parse_prescription_text, InteractionKnowledgeBase, MedicationAnalysis, MedicationError,
    MedicationSafetyAnalyzer,
};
use crate::models::{Alert, Medication, RiskScore, VitalsReading};
use crate::risk::RiskScoringEngine;
use crate::vitals::VitalsAnomalyEngine;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Medication(#[from] MedicationError),

    #[error(transparent)]
    Alert(#[from] AlertError),
}

/// Result of persisting a reading through the ingestion ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// The reading after unit normalisation.
    pub reading: VitalsReading,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionReview {
    pub medications: Vec<Medication>,
    pub analysis: MedicationAnalysis,
    pub alerts: Vec<Alert>,
}

/// Wires the engines, a knowledge base and an alert store together.
/// Every alert produced through the facade is recorded in its store.
pub struct ClinicalEngine<K> {
    config: EngineConfig,
    vitals: VitalsAnomalyEngine,
    risk: RiskScoringEngine,
    medication: MedicationSafetyAnalyzer,
    factory: AlertFactory,
    alerts: AlertStore,
    knowledge_base: K,
}

impl<K: InteractionKnowledgeBase> ClinicalEngine<K> {
    /// Rejects an invalid configuration up front.
    pub fn new(config: EngineConfig, knowledge_base: K) -> Result<Self, EngineError> {
        config.validate()?;
        tracing::info!(
            anomaly_threshold = config.anomaly_threshold_percentage,
            window_days = config.risk_calculation_window_days,
            method = %config.risk_method,
            "Clinical engine initialised"
        );
        Ok(Self {
            vitals: VitalsAnomalyEngine::new(&config),
            risk: RiskScoringEngine::new(&config),
            medication: MedicationSafetyAnalyzer::new(),
            factory: AlertFactory::new(),
            alerts: AlertStore::new(),
            knowledge_base,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn alerts(&self) -> &AlertStore {
        &self.alerts
    }

    pub fn knowledge_base(&self) -> &K {
        &self.knowledge_base
    }

    /// Emergency and statistical screening of a new reading against history.
    pub fn screen_reading(
        &self,
        patient_id: i64,
        reading: &VitalsReading,
        history: &[VitalsReading],
    ) -> Result<Vec<Alert>, EngineError> {
        self.screen_reading_at(patient_id, reading, history, chrono::Local::now().naive_local())
    }

    pub fn screen_reading_at(
        &self,
        patient_id: i64,
        reading: &VitalsReading,
        history: &[VitalsReading],
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, EngineError> {
        let start = Instant::now();
        let findings = self.vitals.evaluate(reading, history);
        let alerts = self.record(self.factory.to_alerts_at(findings, patient_id, now))?;

        tracing::info!(
            patient_id,
            alerts = alerts.len(),
            history = history.len(),
            processing_ms = start.elapsed().as_millis() as u64,
            "Vitals screening complete"
        );
        Ok(alerts)
    }

    /// Normalise units and apply the ingestion ladder.
    pub fn ingest_reading(
        &self,
        patient_id: i64,
        reading: &VitalsReading,
    ) -> Result<IngestOutcome, EngineError> {
        self.ingest_reading_at(patient_id, reading, chrono::Local::now().naive_local())
    }

    pub fn ingest_reading_at(
        &self,
        patient_id: i64,
        reading: &VitalsReading,
        now: NaiveDateTime,
    ) -> Result<IngestOutcome, EngineError> {
        let (normalized, findings) = self.vitals.check_ingestion(reading);
        let alerts = self.record(self.factory.to_alerts_at(findings, patient_id, now))?;

        tracing::info!(patient_id, alerts = alerts.len(), "Reading ingested");
        Ok(IngestOutcome {
            reading: normalized,
            alerts,
        })
    }

    /// Parse free text, then review the parsed medications.
    pub fn review_prescription(
        &self,
        patient_id: i64,
        text: &str,
    ) -> Result<PrescriptionReview, EngineError> {
        let medications = parse_prescription_text(text);
        self.review_medications(patient_id, medications)
    }

    pub fn review_medications(
        &self,
        patient_id: i64,
        medications: Vec<Medication>,
    ) -> Result<PrescriptionReview, EngineError> {
        self.review_medications_at(patient_id, medications, chrono::Local::now().naive_local())
    }

    /// A knowledge-base failure aborts the review before any alert is stored.
    pub fn review_medications_at(
        &self,
        patient_id: i64,
        medications: Vec<Medication>,
        now: NaiveDateTime,
    ) -> Result<PrescriptionReview, EngineError> {
        let analysis = self.medication.analyze(&medications, &self.knowledge_base)?;
        let findings = self.medication.to_findings(&analysis);
        let alerts = self.record(self.factory.to_alerts_at(findings, patient_id, now))?;

        tracing::info!(
            patient_id,
            medications = medications.len(),
            alerts = alerts.len(),
            "Prescription reviewed"
        );
        Ok(PrescriptionReview {
            medications,
            analysis,
            alerts,
        })
    }

    /// Hypertension and diabetes scores over the configured window ending at `now`.
    pub fn assess_risk(&self, readings: &[VitalsReading], now: NaiveDateTime) -> Vec<RiskScore> {
        self.risk.assess_all(readings, now)
    }

    fn record(&self, mut alerts: Vec<Alert>) -> Result<Vec<Alert>, EngineError> {
        sort_alerts(&mut alerts);
        self.alerts.insert_all(alerts.clone())?;
        Ok(alerts)
    }
}
