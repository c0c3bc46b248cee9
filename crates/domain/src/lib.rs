//! news-verdict domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Articles, search parameters and classification results
//! - `ports`: Trait definitions for the news provider and classifier
//! - `usecases`: The fetch-then-classify cycle and the dashboard state machine

pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;
