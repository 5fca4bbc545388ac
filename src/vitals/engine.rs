use crate::config::EngineConfig;
use crate::models::{Finding, VitalsReading};

use super::emergency::check_emergency_thresholds;
use super::ingestion::{check_ingestion_thresholds, normalize_units};
use super::statistical::check_statistical_anomalies;

/// Emergency and statistical checks for a single new reading.
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone)]
pub struct VitalsAnomalyEngine {
    threshold_fraction: f64,
    min_history: usize,
}

impl VitalsAnomalyEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            threshold_fraction: config.anomaly_threshold_fraction(),
            min_history: config.min_history_readings,
        }
    }

    /// Emergency pass first, then statistical pass; results concatenated.
    pub fn evaluate(&self, reading: &VitalsReading, history: &[VitalsReading]) -> Vec<Finding> {
        let emergency = check_emergency_thresholds(reading);
        let statistical = check_statistical_anomalies(
            reading,
            history,
            self.threshold_fraction,
            self.min_history,
        );

        tracing::debug!(
            emergency = emergency.len(),
            statistical = statistical.len(),
            history = history.len(),
            "Vitals anomaly evaluation complete"
        );

        emergency.into_iter().chain(statistical).collect()
    }

    /// Normalise units, then apply the ingestion ladder.
    /// Returns the normalised reading alongside its findings so the caller
    /// persists the same values the rules saw.
    pub fn check_ingestion(&self, reading: &VitalsReading) -> (VitalsReading, Vec<Finding>) {
        let normalized = normalize_units(reading);
        let findings = check_ingestion_thresholds(&normalized);
        (normalized, findings)
    }
}

impl Default for VitalsAnomalyEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
