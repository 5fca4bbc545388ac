use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{FindingKind, Severity};

/// Free-form context attached to findings and alerts.
pub type Metadata = BTreeMap<String, Value>;

/// A candidate issue, not yet bound to a patient or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub title: String,
    pub message: String,
    pub recommendation: Option<String>,
    pub metadata: Metadata,
}

impl Finding {
    pub fn new(
        severity: Severity,
        kind: FindingKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            title: title.into(),
            message: message.into(),
            recommendation: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
