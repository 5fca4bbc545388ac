pub mod factory;
pub mod store;

pub use factory::{compare_alerts, sort_alerts, AlertFactory};
pub use store::{AlertError, AlertFilter, AlertStore};
