use chrono::{Duration, NaiveDateTime};

use crate::config::EngineConfig;
use crate::models::{RiskScore, VitalsReading};

use super::diabetes::assess_diabetes;
use super::hypertension::assess_hypertension;
use super::RiskAssessment;

/// Per-condition heuristic risk scores over a window of readings.
///
/// Scores are recomputed from scratch on every call. The only time input
/// is the `computed_at` stamp; score, level and drivers depend on the
/// readings alone.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine {
    window_days: i64,
    method: String,
}

impl RiskScoringEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            window_days: config.risk_calculation_window_days,
            method: config.risk_method.clone(),
        }
    }

    /// Readings recorded within the configured number of days before `now`.
    pub fn window(&self, readings: &[VitalsReading], now: NaiveDateTime) -> Vec<VitalsReading> {
        let cutoff = now - Duration::days(self.window_days);
        readings
            .iter()
            .filter(|r| r.recorded_at >= cutoff)
            .cloned()
            .collect()
    }

    pub fn calculate_hypertension_risk(&self, readings: &[VitalsReading]) -> RiskScore {
        self.calculate_hypertension_risk_at(readings, chrono::Local::now().naive_local())
    }

    pub fn calculate_hypertension_risk_at(
        &self,
        readings: &[VitalsReading],
        computed_at: NaiveDateTime,
    ) -> RiskScore {
        self.stamp(assess_hypertension(readings), computed_at)
    }

    pub fn calculate_diabetes_risk(&self, readings: &[VitalsReading]) -> RiskScore {
        self.calculate_diabetes_risk_at(readings, chrono::Local::now().naive_local())
    }

    pub fn calculate_diabetes_risk_at(
        &self,
        readings: &[VitalsReading],
        computed_at: NaiveDateTime,
    ) -> RiskScore {
        self.stamp(assess_diabetes(readings), computed_at)
    }

    /// Window the readings at `now`, then score every condition.
    pub fn assess_all(&self, readings: &[VitalsReading], now: NaiveDateTime) -> Vec<RiskScore> {
        let window = self.window(readings, now);
        let scores = vec![
            self.calculate_hypertension_risk_at(&window, now),
            self.calculate_diabetes_risk_at(&window, now),
        ];

        tracing::info!(
            window_readings = window.len(),
            window_days = self.window_days,
            hypertension = scores[0].score,
            diabetes = scores[1].score,
            "Risk assessment complete"
        );

        scores
    }

    fn stamp(&self, assessment: RiskAssessment, computed_at: NaiveDateTime) -> RiskScore {
        RiskScore {
            risk_type: assessment.risk_type,
            score: assessment.score,
            risk_level: assessment.risk_level,
            drivers: assessment.drivers,
            confidence: assessment.confidence,
            recommendations: assessment.recommendations,
            method: self.method.clone(),
            computed_at,
        }
    }
}

impl Default for RiskScoringEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
