use crate::helpers::{mean, round_to};
use crate::models::{Metadata, RiskLevel, RiskType, VitalsReading};

use super::RiskAssessment;

/// Hypertension score from mean blood pressure over the window.
///
/// Only readings carrying both systolic and diastolic values count; a zero
/// in either is an unset field.
/// `raw = max(0, (sys - 120) * 1.2) + max(0, (dia - 80) * 1.5)`, clamped to 0-100.
pub fn assess_hypertension(readings: &[VitalsReading]) -> RiskAssessment {
    if readings.is_empty() {
        return RiskAssessment::insufficient(
            RiskType::Hypertension,
            "data_availability",
            "insufficient",
        );
    }

    let pairs: Vec<(f64, f64)> = readings
        .iter()
        .filter_map(|r| {
            let systolic = r.systolic.filter(|v| v.is_finite() && *v != 0.0)?;
            let diastolic = r.diastolic.filter(|v| v.is_finite() && *v != 0.0)?;
            Some((systolic, diastolic))
        })
        .collect();

    let systolic: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let diastolic: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let (Some(avg_systolic), Some(avg_diastolic)) = (mean(&systolic), mean(&diastolic)) else {
        return RiskAssessment::insufficient(RiskType::Hypertension, "blood_pressure", "no_data");
    };

    let systolic_score = ((avg_systolic - 120.0) * 1.2).max(0.0);
    let diastolic_score = ((avg_diastolic - 80.0) * 1.5).max(0.0);
    let score = (systolic_score + diastolic_score).clamp(0.0, 100.0);

    let mut drivers = Metadata::new();
    drivers.insert("avg_systolic".into(), round_to(avg_systolic, 1).into());
    drivers.insert("avg_diastolic".into(), round_to(avg_diastolic, 1).into());
    drivers.insert("readings_count".into(), pairs.len().into());
    if avg_systolic > 140.0 {
        drivers.insert("high_systolic".into(), true.into());
    }
    if avg_diastolic > 90.0 {
        drivers.insert("high_diastolic".into(), true.into());
    }

    RiskAssessment {
        risk_type: RiskType::Hypertension,
        score: round_to(score, 2),
        risk_level: hypertension_level(score),
        drivers,
        confidence: (pairs.len() as f64 * 20.0).min(100.0),
        recommendations: hypertension_recommendations(score),
    }
}

pub fn hypertension_level(score: f64) -> RiskLevel {
    if score < 20.0 {
        RiskLevel::Low
    } else if score < 50.0 {
        RiskLevel::Moderate
    } else if score < 80.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

/// Higher bands keep every lower-band recommendation.
fn hypertension_recommendations(score: f64) -> Vec<String> {
    let mut recommendations = Vec::new();
    if score > 50.0 {
        recommendations.push("Monitor blood pressure daily".to_string());
        recommendations.push("Reduce sodium intake".to_string());
        recommendations.push("Increase physical activity".to_string());
    }
    if score > 75.0 {
        recommendations.push("Consult healthcare provider immediately".to_string());
        recommendations.push("Consider medication review".to_string());
    }
    recommendations
}
