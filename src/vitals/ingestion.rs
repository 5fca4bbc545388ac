//! Threshold ladder applied when a reading is persisted.
//!
//! This is a second rule set with its own cut points, separate from the
//! emergency pass in [`super::emergency`]. The two overlap (both look at
//! systolic pressure, heart rate, glucose and oxygen) but disagree on where
//! the lines are and which severities apply; they are kept apart so each
//! can be tuned on its own.

use crate::helpers::round_to;
use crate::models::{Finding, FindingKind, Severity, VitalsReading};

/// Temperatures above this are taken to be Fahrenheit.
const FAHRENHEIT_CUTOFF: f64 = 45.0;
/// Weights above this are taken to be pounds.
const POUNDS_CUTOFF: f64 = 200.0;
const KG_PER_LB: f64 = 2.20462;

/// Convert readings that were clearly entered in imperial units.
pub fn normalize_units(reading: &VitalsReading) -> VitalsReading {
    let mut normalized = reading.clone();

    if let Some(t) = reading.temperature.filter(|t| *t > FAHRENHEIT_CUTOFF) {
        normalized.temperature = Some((t - 32.0) * (5.0 / 9.0));
    }
    if let Some(w) = reading.weight.filter(|w| *w > POUNDS_CUTOFF) {
        normalized.weight = Some(w / KG_PER_LB);
    }

    normalized
}

/// Run the ingestion ladder. Missing fields read as zero and never fire.
pub fn check_ingestion_thresholds(reading: &VitalsReading) -> Vec<Finding> {
    let mut findings = Vec::new();

    let s = reading.systolic.unwrap_or(0.0);
    let d = reading.diastolic.unwrap_or(0.0);
    let hr = reading.heart_rate.unwrap_or(0.0);
    let bg = reading.blood_glucose.unwrap_or(0.0);
    let spo2 = reading.oxygen_saturation.unwrap_or(0.0);
    let t = reading.temperature.unwrap_or(0.0);

    let bp_tier = if s >= 180.0 || d >= 120.0 {
        Some((
            Severity::Critical,
            "Hypertensive Crisis",
            format!("BP {s}/{d} mmHg exceeds crisis threshold"),
            "Seek immediate medical attention",
        ))
    } else if s >= 160.0 || d >= 100.0 {
        Some((
            Severity::Urgent,
            "Severely Elevated Blood Pressure",
            format!("BP {s}/{d} mmHg is severely elevated"),
            "Review antihypertensive therapy",
        ))
    } else if s >= 140.0 || d >= 90.0 {
        Some((
            Severity::Serious,
            "Elevated Blood Pressure",
            format!("BP {s}/{d} mmHg is above normal"),
            "Monitor and consider medication adjustment",
        ))
    } else {
        None
    };
    if let Some((severity, title, message, recommendation)) = bp_tier {
        findings.push(
            Finding::new(severity, FindingKind::RiskThreshold, title, message)
                .with_recommendation(recommendation)
                .with_meta("systolic", s)
                .with_meta("diastolic", d),
        );
    }

    if hr >= 130.0 {
        findings.push(
            Finding::new(
                Severity::Urgent,
                FindingKind::Anomaly,
                "Tachycardia Detected",
                format!("Heart rate {hr} bpm"),
            )
            .with_recommendation("Assess for arrhythmia or dehydration")
            .with_meta("heart_rate", hr),
        );
    }

    let glucose_tier = if bg >= 250.0 {
        Some((
            Severity::Urgent,
            "Severe Hyperglycemia",
            "Review insulin/medication; check for DKA symptoms",
        ))
    } else if bg >= 180.0 {
        Some((
            Severity::Serious,
            "Hyperglycemia",
            "Dietary review and medication adherence",
        ))
    } else {
        None
    };
    if let Some((severity, title, recommendation)) = glucose_tier {
        findings.push(
            Finding::new(
                severity,
                FindingKind::RiskThreshold,
                title,
                format!("Blood glucose {bg} mg/dL"),
            )
            .with_recommendation(recommendation)
            .with_meta("blood_glucose", bg),
        );
    }

    if spo2 > 0.0 && spo2 <= 92.0 {
        let severity = if spo2 <= 88.0 {
            Severity::Urgent
        } else {
            Severity::Serious
        };
        findings.push(
            Finding::new(
                severity,
                FindingKind::Anomaly,
                "Low Oxygen Saturation",
                format!("SpO2 {spo2}%"),
            )
            .with_recommendation("Evaluate respiratory status")
            .with_meta("oxygen_saturation", spo2),
        );
    }

    if t >= 38.0 {
        findings.push(
            Finding::new(
                Severity::Mild,
                FindingKind::Anomaly,
                "Fever Detected",
                format!("Temperature {} °C", round_to(t, 1)),
            )
            .with_recommendation("Hydration and symptomatic care; monitor")
            .with_meta("temperature_c", t),
        );
    }

    findings
}
