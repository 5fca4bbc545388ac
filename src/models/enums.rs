use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Severity {
    Mild => "mild",
    Serious => "serious",
    Urgent => "urgent",
    Critical => "critical",
});

impl Severity {
    /// The one ordering used for every severity comparison.
    pub fn rank(self) -> u8 {
        match self {
            Self::Mild => 0,
            Self::Serious => 1,
            Self::Urgent => 2,
            Self::Critical => 3,
        }
    }

    /// Sort key persisted on alerts; higher is more urgent.
    pub fn priority_score(self) -> i32 {
        (i32::from(self.rank()) + 1) * 25
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

str_enum!(FindingKind {
    Anomaly => "anomaly",
    DrugInteraction => "drug_interaction",
    RiskThreshold => "risk_threshold",
    VitalEmergency => "vital_emergency",
    MedicationAdherence => "medication_adherence",
});

str_enum!(RiskType {
    Hypertension => "hypertension",
    Diabetes => "diabetes",
});

str_enum!(RiskLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
    Critical => "critical",
});

str_enum!(InteractionSeverity {
    Minor => "minor",
    Moderate => "moderate",
    Major => "major",
    Contraindicated => "contraindicated",
});

impl InteractionSeverity {
    /// Lenient mapping used when importing third-party interaction data.
    /// Unknown or missing labels fall back to moderate.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Moderate;
        };
        match raw.trim().to_lowercase().as_str() {
            "minor" | "low" => Self::Minor,
            "moderate" | "medium" => Self::Moderate,
            "major" | "high" => Self::Major,
            "contraindicated" | "contra-indicated" | "contra" => Self::Contraindicated,
            _ => Self::Moderate,
        }
    }

    /// Projection onto the three-level flag scale.
    pub fn flag_severity(self) -> FlagSeverity {
        match self {
            Self::Major | Self::Contraindicated => FlagSeverity::High,
            Self::Moderate => FlagSeverity::Medium,
            Self::Minor => FlagSeverity::Low,
        }
    }

    pub fn finding_severity(self) -> Severity {
        match self {
            Self::Contraindicated => Severity::Critical,
            Self::Major => Severity::Urgent,
            Self::Moderate => Severity::Serious,
            Self::Minor => Severity::Mild,
        }
    }
}

str_enum!(FlagSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl FlagSeverity {
    pub fn finding_severity(self) -> Severity {
        match self {
            Self::High => Severity::Urgent,
            Self::Medium => Severity::Serious,
            Self::Low => Severity::Mild,
        }
    }
}

str_enum!(MedicationFindingKind {
    Dose => "dose",
    Frequency => "frequency",
    Duplicate => "duplicate",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::Mild, "mild"),
            (Severity::Serious, "serious"),
            (Severity::Urgent, "urgent"),
            (Severity::Critical, "critical"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Mild < Severity::Serious);
        assert!(Severity::Serious < Severity::Urgent);
        assert!(Severity::Urgent < Severity::Critical);
        assert!(Severity::Critical.priority_score() > Severity::Urgent.priority_score());
        assert!(Severity::Serious.priority_score() > Severity::Mild.priority_score());
    }

    #[test]
    fn severity_serializes_snake_case() {
        let json = serde_json::to_string(&FindingKind::VitalEmergency).unwrap();
        assert_eq!(json, "\"vital_emergency\"");
        let json = serde_json::to_string(&Severity::Urgent).unwrap();
        assert_eq!(json, "\"urgent\"");
    }

    #[test]
    fn interaction_severity_normalization() {
        assert_eq!(InteractionSeverity::normalize(Some("LOW")), InteractionSeverity::Minor);
        assert_eq!(InteractionSeverity::normalize(Some("medium")), InteractionSeverity::Moderate);
        assert_eq!(InteractionSeverity::normalize(Some(" High ")), InteractionSeverity::Major);
        assert_eq!(
            InteractionSeverity::normalize(Some("contra-indicated")),
            InteractionSeverity::Contraindicated
        );
        assert_eq!(InteractionSeverity::normalize(Some("severe?")), InteractionSeverity::Moderate);
        assert_eq!(InteractionSeverity::normalize(None), InteractionSeverity::Moderate);
    }

    #[test]
    fn interaction_flag_mapping() {
        assert_eq!(InteractionSeverity::Contraindicated.flag_severity(), FlagSeverity::High);
        assert_eq!(InteractionSeverity::Major.flag_severity(), FlagSeverity::High);
        assert_eq!(InteractionSeverity::Moderate.flag_severity(), FlagSeverity::Medium);
        assert_eq!(InteractionSeverity::Minor.flag_severity(), FlagSeverity::Low);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Severity::from_str("severe").is_err());
        assert!(RiskLevel::from_str("").is_err());
        let err = FindingKind::from_str("unknown").unwrap_err();
        assert_eq!(err.field, "FindingKind");
    }
}
