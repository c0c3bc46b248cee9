//! news-verdict adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `newsapi`: NewsAPI top-headlines news source
//! - `backend`: HTTP classification backend
//! - `stub`: Offline news source and classifier

pub mod backend;
pub mod newsapi;
pub mod stub;

pub use backend::{BackendConfig, HttpClassifier};
pub use newsapi::{NewsApiConfig, NewsApiSource};
pub use stub::{StubClassifier, StubNewsSource};
