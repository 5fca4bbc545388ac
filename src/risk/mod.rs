pub mod diabetes;
pub mod engine;
pub mod hypertension;

use crate::models::{Metadata, RiskLevel, RiskType};

pub use diabetes::assess_diabetes;
pub use engine::RiskScoringEngine;
pub use hypertension::assess_hypertension;

/// The deterministic part of a risk score, before it is stamped with a
/// method tag and computation time.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub risk_type: RiskType,
    pub score: f64,
    pub risk_level: RiskLevel,
    pub drivers: Metadata,
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    /// Zero-score result used whenever a window has nothing usable.
    fn insufficient(risk_type: RiskType, driver: &str, reason: &str) -> Self {
        let mut drivers = Metadata::new();
        drivers.insert(driver.to_string(), reason.into());
        Self {
            risk_type,
            score: 0.0,
            risk_level: RiskLevel::Low,
            drivers,
            confidence: 0.0,
            recommendations: Vec::new(),
        }
    }
}
