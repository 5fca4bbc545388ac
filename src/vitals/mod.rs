pub mod emergency;
pub mod engine;
pub mod ingestion;
pub mod statistical;

pub use emergency::check_emergency_thresholds;
pub use engine::VitalsAnomalyEngine;
pub use ingestion::{check_ingestion_thresholds, normalize_units};
pub use statistical::check_statistical_anomalies;
