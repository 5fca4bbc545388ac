use crate::helpers::{mean, round_to};
use crate::models::{Finding, FindingKind, Severity, VitalField, VitalsReading};

/// Compare a new reading with the patient's own recent mean.
///
/// A field is skipped when the new reading lacks it, when history has fewer
/// than `min_history` non-null values for it, or when the mean is not
/// positive. Anything deviating by more than `threshold_fraction` of the
/// mean becomes a mild anomaly finding.
pub fn check_statistical_anomalies(
    reading: &VitalsReading,
    history: &[VitalsReading],
    threshold_fraction: f64,
    min_history: usize,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for field in VitalField::STATISTICAL {
        let Some(current) = reading.value(field) else {
            continue;
        };

        let values: Vec<f64> = history.iter().filter_map(|r| r.value(field)).collect();
        if values.len() < min_history {
            tracing::debug!(
                field = field.as_str(),
                available = values.len(),
                required = min_history,
                "Not enough history, skipping statistical check"
            );
            continue;
        }

        let Some(historical_mean) = mean(&values) else {
            continue;
        };
        if historical_mean <= 0.0 {
            continue;
        }

        let deviation = (current - historical_mean).abs() / historical_mean;
        if deviation <= threshold_fraction {
            continue;
        }

        let direction = if current > historical_mean {
            "increased"
        } else {
            "decreased"
        };
        let percentage_change = (deviation * 100.0).trunc() as i64;
        let display = field.display_name();

        findings.push(
            Finding::new(
                Severity::Mild,
                FindingKind::Anomaly,
                format!("{display} Anomaly"),
                format!(
                    "{display} {direction} by {percentage_change}% from recent average: {current} {}",
                    field.unit()
                ),
            )
            .with_recommendation(
                "Monitor trend and consult healthcare provider if pattern continues",
            )
            .with_meta("vital_type", field.as_str())
            .with_meta("direction", direction)
            .with_meta("current_value", current)
            .with_meta("historical_mean", round_to(historical_mean, 2))
            .with_meta("deviation_percentage", percentage_change),
        );
    }

    findings
}
