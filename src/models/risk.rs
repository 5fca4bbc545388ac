use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{RiskLevel, RiskType};
use super::finding::Metadata;

/// Heuristic risk estimate for one condition, computed fresh from a
/// window of readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub risk_type: RiskType,
    /// 0-100.
    pub score: f64,
    pub risk_level: RiskLevel,
    pub drivers: Metadata,
    /// 0-100; grows with the number of usable readings.
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub method: String,
    pub computed_at: NaiveDateTime,
}
