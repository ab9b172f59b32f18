//! Song recommendation server library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod recommend;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{load_catalog, load_similarity_index, Catalog, SimilarityIndex, TrackRecord};
pub use recommend::Recommender;
pub use server::{run_server, RequestsLoggingLevel};
