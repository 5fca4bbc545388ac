use crate::helpers::{mean, round_to};
use crate::models::{Metadata, RiskLevel, RiskType, VitalsReading};

use super::RiskAssessment;

const PREDIABETES_FLOOR: f64 = 100.0;
const DIABETES_FLOOR: f64 = 126.0;
const SEVERE_SPIKE: f64 = 200.0;

/// Diabetes score from mean and peak blood glucose over the window.
pub fn assess_diabetes(readings: &[VitalsReading]) -> RiskAssessment {
    let glucose: Vec<f64> = readings
        .iter()
        .filter_map(|r| r.blood_glucose.filter(|v| v.is_finite()))
        .collect();
    let Some(avg_glucose) = mean(&glucose) else {
        return RiskAssessment::insufficient(RiskType::Diabetes, "blood_glucose", "no_data");
    };
    let max_glucose = glucose.iter().copied().fold(f64::MIN, f64::max);

    let mut score = if avg_glucose < PREDIABETES_FLOOR {
        0.0
    } else if avg_glucose < DIABETES_FLOOR {
        30.0 + (avg_glucose - PREDIABETES_FLOOR) * 1.5
    } else {
        70.0 + ((avg_glucose - DIABETES_FLOOR) * 0.5).min(30.0)
    };
    if max_glucose > SEVERE_SPIKE {
        score = score.max(80.0);
    }
    let score = score.clamp(0.0, 100.0);

    let mut drivers = Metadata::new();
    drivers.insert("avg_glucose".into(), round_to(avg_glucose, 1).into());
    drivers.insert("max_glucose".into(), round_to(max_glucose, 1).into());
    drivers.insert("readings_count".into(), glucose.len().into());

    RiskAssessment {
        risk_type: RiskType::Diabetes,
        score: round_to(score, 2),
        risk_level: diabetes_level(score),
        drivers,
        confidence: (glucose.len() as f64 * 25.0).min(100.0),
        recommendations: diabetes_recommendations(score),
    }
}

pub fn diabetes_level(score: f64) -> RiskLevel {
    if score < 25.0 {
        RiskLevel::Low
    } else if score < 50.0 {
        RiskLevel::Moderate
    } else if score < 75.0 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

fn diabetes_recommendations(score: f64) -> Vec<String> {
    let mut recommendations = Vec::new();
    if score > 30.0 {
        recommendations.push("Monitor blood glucose regularly".to_string());
        recommendations.push("Follow diabetic diet guidelines".to_string());
        recommendations.push("Maintain regular exercise routine".to_string());
    }
    if score > 70.0 {
        recommendations.push("Urgent medical consultation required".to_string());
        recommendations.push("Review medication adherence".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::*;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn glucose(values: &[f64]) -> Vec<VitalsReading> {
        values
            .iter()
            .enumerate()
            .map(|(i, g)| VitalsReading {
                blood_glucose: Some(*g),
                ..VitalsReading::at(t0() - Duration::hours(i as i64 * 6))
            })
            .collect()
    }

    #[test]
    fn empty_window_reports_no_glucose_data() {
        let result = assess_diabetes(&[]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.drivers["blood_glucose"], "no_data");
        assert!(!result.drivers.contains_key("data_availability"));
    }

    #[test]
    fn readings_without_glucose_report_no_data() {
        let readings = vec![VitalsReading {
            systolic: Some(130.0),
            ..VitalsReading::at(t0())
        }];
        let result = assess_diabetes(&readings);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.drivers["blood_glucose"], "no_data");
    }

    #[test]
    fn normal_glucose_scores_zero() {
        let result = assess_diabetes(&glucose(&[90.0, 95.0, 88.0]));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.confidence, 75.0);
    }

    #[test]
    fn prediabetes_band() {
        // 30 + (110-100)*1.5 = 45
        let result = assess_diabetes(&glucose(&[110.0, 110.0]));
        assert_eq!(result.score, 45.0);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn mean_150_scores_82() {
        let result = assess_diabetes(&glucose(&[150.0; 5]));
        assert_eq!(result.score, 82.0);
        assert!((70.0..=92.5).contains(&result.score));
        // 82 sits in the top band (< 75 high, else critical).
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(result.drivers["avg_glucose"], 150.0);
    }

    #[test]
    fn diabetic_band_is_capped_at_100() {
        let result = assess_diabetes(&glucose(&[190.0, 195.0]));
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn single_spike_forces_80() {
        // mean = 100 -> base 30, but the 210 spike lifts it to 80
        let result = assess_diabetes(&glucose(&[45.0, 45.0, 210.0]));
        assert_eq!(result.score, 80.0);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.drivers["max_glucose"], 210.0);
    }

    #[test]
    fn spike_never_lowers_score() {
        let result = assess_diabetes(&glucose(&[180.0, 205.0, 190.0]));
        assert!(result.score > 80.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let readings = glucose(&[131.0, 142.5, 119.0, 160.2]);
        let a = assess_diabetes(&readings);
        let b = assess_diabetes(&readings);
        assert_eq!(a, b);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
    }
}
