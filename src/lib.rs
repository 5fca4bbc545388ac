pub mod alerts;
pub mod config;
pub mod engine;
pub mod helpers;
pub mod medication;
pub mod models;
pub mod risk;
pub mod vitals;

use tracing_subscriber::EnvFilter;

pub use alerts::{AlertFactory, AlertFilter, AlertStore};
pub use config::EngineConfig;
pub use engine::{ClinicalEngine, EngineError};
pub use medication::{InteractionKnowledgeBase, MedicationSafetyAnalyzer};
pub use risk::RiskScoringEngine;
pub use vitals::VitalsAnomalyEngine;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// built-in filter. Later calls are no-ops.
pub fn init_tracing() {
    let initialised = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if initialised {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
}
