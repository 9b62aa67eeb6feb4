//! Repository layer
//!
//! Repositories are stateless adapters over the inference API. They give
//! the scheduler and services narrow, trait-based interfaces so the polling
//! logic can be exercised without a network.

mod tasks;

// Re-export traits
pub use tasks::{JobSubmitter, StatusFetcher};

// Re-export implementations
pub use tasks::HttpTaskRepository;
