//! Application use cases / business logic

pub mod dashboard;
pub mod enrich;

pub use dashboard::{Dashboard, DashboardState, Trigger};
pub use enrich::{CycleError, EnrichConfig, EnrichUseCase};
