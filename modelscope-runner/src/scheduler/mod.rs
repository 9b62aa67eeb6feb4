//! Scheduler layer for the runner
//!
//! This layer drives a submitted image job to completion: it polls the task
//! endpoint under a wall-clock budget, waiting between polls according to a
//! bounded backoff schedule, and reports one of the terminal outcomes.

pub mod backoff;
pub mod error;
pub mod poller;

pub use backoff::Backoff;
pub use error::{JobError, JobErrorKind};
pub use poller::{Completion, JobPoller, NoopObserver, PollObserver};
