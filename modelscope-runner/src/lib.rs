//! ModelScope runner
//!
//! Drives inference operations against the ModelScope API: asynchronous
//! image jobs polled with bounded backoff, chat and vision completions, and
//! embeddings. Work items can be executed in batches with per-item error
//! handling.

pub mod config;
pub mod repository;
pub mod scheduler;
pub mod service;

pub use config::{PollPolicy, RunnerConfig};
pub use scheduler::{JobError, JobErrorKind, JobPoller, NoopObserver, PollObserver};
pub use service::{Locale, Operation, OperationError, OperationRunner, describe_error};
