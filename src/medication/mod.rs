pub mod analyzer;
pub mod knowledge;
pub mod parser;
pub mod rules;
pub mod sqlite;
pub mod types;

pub use analyzer::MedicationSafetyAnalyzer;
pub use knowledge::{InteractionKnowledgeBase, InteractionTable, KnowledgeBaseError};
pub use parser::parse_prescription_text;
pub use sqlite::SqliteInteractionStore;
pub use types::{Flag, InteractionEntry, MedicationAnalysis, MedicationError, MedicationFinding};
