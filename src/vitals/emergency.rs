use std::sync::LazyLock;

use crate::models::{Finding, FindingKind, Severity, VitalField, VitalsReading};

/// A single-reading rule that fires regardless of history.
struct EmergencyRule {
    field: VitalField,
    breached: fn(f64) -> bool,
    severity: Severity,
    title: &'static str,
    message: fn(f64) -> String,
    recommendation: &'static str,
}

// Evaluated in order; findings keep this order.
static EMERGENCY_RULES: LazyLock<Vec<EmergencyRule>> = LazyLock::new(|| {
    vec![
        EmergencyRule {
            field: VitalField::Systolic,
            breached: |v| v > 180.0,
            severity: Severity::Urgent,
            title: "Hypertensive Crisis",
            message: |v| format!("Systolic blood pressure critically high: {v} mmHg"),
            recommendation: "Seek immediate medical attention",
        },
        EmergencyRule {
            field: VitalField::Diastolic,
            breached: |v| v > 120.0,
            severity: Severity::Urgent,
            title: "Diastolic Hypertensive Crisis",
            message: |v| format!("Diastolic blood pressure critically high: {v} mmHg"),
            recommendation: "Seek immediate medical attention",
        },
        EmergencyRule {
            field: VitalField::HeartRate,
            breached: |v| v > 120.0,
            severity: Severity::Serious,
            title: "Tachycardia",
            message: |v| format!("Heart rate elevated: {v} BPM"),
            recommendation: "Monitor closely and consult healthcare provider",
        },
        EmergencyRule {
            field: VitalField::HeartRate,
            breached: |v| v < 50.0,
            severity: Severity::Serious,
            title: "Bradycardia",
            message: |v| format!("Heart rate low: {v} BPM"),
            recommendation: "Monitor closely and consult healthcare provider",
        },
        EmergencyRule {
            field: VitalField::OxygenSaturation,
            breached: |v| v < 90.0,
            severity: Severity::Urgent,
            title: "Low Oxygen Saturation",
            message: |v| format!("Oxygen saturation critically low: {v}%"),
            recommendation: "Seek immediate medical attention",
        },
        EmergencyRule {
            field: VitalField::OxygenSaturation,
            breached: |v| (90.0..95.0).contains(&v),
            severity: Severity::Serious,
            title: "Reduced Oxygen Saturation",
            message: |v| format!("Oxygen saturation below normal: {v}%"),
            recommendation: "Monitor closely and consider medical consultation",
        },
        EmergencyRule {
            field: VitalField::BloodGlucose,
            breached: |v| v > 300.0,
            severity: Severity::Urgent,
            title: "Severe Hyperglycemia",
            message: |v| format!("Blood glucose dangerously high: {v} mg/dL"),
            recommendation: "Seek immediate medical attention",
        },
        EmergencyRule {
            field: VitalField::BloodGlucose,
            breached: |v| v < 70.0,
            severity: Severity::Urgent,
            title: "Hypoglycemia",
            message: |v| format!("Blood glucose low: {v} mg/dL"),
            recommendation: "Consume fast-acting carbohydrates and monitor",
        },
        EmergencyRule {
            field: VitalField::Temperature,
            breached: |v| v > 39.0,
            severity: Severity::Serious,
            title: "High Fever",
            message: |v| format!("Temperature elevated: {v}°C"),
            recommendation: "Monitor temperature and consider medical consultation",
        },
        EmergencyRule {
            field: VitalField::Temperature,
            breached: |v| v < 35.0,
            severity: Severity::Serious,
            title: "Hypothermia Risk",
            message: |v| format!("Temperature low: {v}°C"),
            recommendation: "Seek warming measures and medical attention",
        },
    ]
});

/// Check a new reading against the emergency thresholds.
/// Fields are independent; several findings may fire for one reading.
/// A zero value is an unset field, not a measurement.
pub fn check_emergency_thresholds(reading: &VitalsReading) -> Vec<Finding> {
    EMERGENCY_RULES
        .iter()
        .filter_map(|rule| {
            let value = reading.value(rule.field).filter(|v| *v != 0.0)?;
            if !(rule.breached)(value) {
                return None;
            }
            Some(
                Finding::new(
                    rule.severity,
                    FindingKind::VitalEmergency,
                    rule.title,
                    (rule.message)(value),
                )
                .with_recommendation(rule.recommendation)
                .with_meta("vital_type", rule.field.as_str())
                .with_meta("value", value),
            )
        })
        .collect()
}
