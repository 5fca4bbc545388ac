use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single vitals reading. Every measurement is optional; a reading
/// recorded at the bedside rarely carries all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReading {
    pub recorded_at: NaiveDateTime,
    #[serde(default)]
    pub systolic: Option<f64>,
    #[serde(default)]
    pub diastolic: Option<f64>,
    #[serde(default)]
    pub heart_rate: Option<f64>,
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// mg/dL.
    #[serde(default)]
    pub blood_glucose: Option<f64>,
    /// Percent.
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VitalsReading {
    /// Empty reading at the given time; fill fields with struct update syntax.
    pub fn at(recorded_at: NaiveDateTime) -> Self {
        Self {
            recorded_at,
            systolic: None,
            diastolic: None,
            heart_rate: None,
            temperature: None,
            blood_glucose: None,
            oxygen_saturation: None,
            weight: None,
            notes: None,
        }
    }

    pub fn value(&self, field: VitalField) -> Option<f64> {
        match field {
            VitalField::Systolic => self.systolic,
            VitalField::Diastolic => self.diastolic,
            VitalField::HeartRate => self.heart_rate,
            VitalField::Temperature => self.temperature,
            VitalField::BloodGlucose => self.blood_glucose,
            VitalField::OxygenSaturation => self.oxygen_saturation,
            VitalField::Weight => self.weight,
        }
        .filter(|v| v.is_finite())
    }
}

/// Numeric fields of a [`VitalsReading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalField {
    Systolic,
    Diastolic,
    HeartRate,
    Temperature,
    BloodGlucose,
    OxygenSaturation,
    Weight,
}

impl VitalField {
    /// Fields compared against the patient's own history.
    pub const STATISTICAL: [VitalField; 6] = [
        VitalField::Systolic,
        VitalField::Diastolic,
        VitalField::HeartRate,
        VitalField::Temperature,
        VitalField::BloodGlucose,
        VitalField::OxygenSaturation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VitalField::Systolic => "systolic",
            VitalField::Diastolic => "diastolic",
            VitalField::HeartRate => "heart_rate",
            VitalField::Temperature => "temperature",
            VitalField::BloodGlucose => "blood_glucose",
            VitalField::OxygenSaturation => "oxygen_saturation",
            VitalField::Weight => "weight",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VitalField::Systolic => "Systolic Blood Pressure",
            VitalField::Diastolic => "Diastolic Blood Pressure",
            VitalField::HeartRate => "Heart Rate",
            VitalField::Temperature => "Temperature",
            VitalField::BloodGlucose => "Blood Glucose",
            VitalField::OxygenSaturation => "Oxygen Saturation",
            VitalField::Weight => "Weight",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalField::Systolic | VitalField::Diastolic => "mmHg",
            VitalField::HeartRate => "BPM",
            VitalField::Temperature => "°C",
            VitalField::BloodGlucose => "mg/dL",
            VitalField::OxygenSaturation => "%",
            VitalField::Weight => "kg",
        }
    }
}
