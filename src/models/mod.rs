pub mod alert;
pub mod enums;
pub mod finding;
pub mod medication;
pub mod risk;
pub mod vitals;

pub use alert::Alert;
pub use enums::*;
pub use finding::{Finding, Metadata};
pub use medication::{DrugInteractionRecord, Medication};
pub use risk::RiskScore;
pub use vitals::{VitalField, VitalsReading};
