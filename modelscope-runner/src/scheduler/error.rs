//! Terminal failures of an image job

use std::time::Duration;

use modelscope_client::ClientError;
use modelscope_core::domain::job::{JobHandle, JobStatus};
use thiserror::Error;

/// Why a job did not produce artifacts
///
/// Each variant is a distinct terminal outcome; none of them is retried by
/// the poller.
#[derive(Debug, Error)]
pub enum JobError {
    /// The caller asked for a zero budget
    #[error("timeout budget must be greater than zero")]
    InvalidBudget,

    /// The job could not be created
    #[error("failed to submit image generation job: {0}")]
    Submit(#[source] ClientError),

    /// The task endpoint could not be read
    #[error("failed to fetch status of task {handle} (attempt {attempts}): {source}")]
    StatusFetchFailed {
        handle: JobHandle,
        attempts: u32,
        #[source]
        source: ClientError,
    },

    /// The server reported that the job failed
    #[error("task {handle} failed: {message}")]
    JobFailed { handle: JobHandle, message: String },

    /// The budget ran out while the job was still in progress
    #[error(
        "task {handle} timed out after {attempts} attempts ({:.1}s), last status {last_status}",
        .elapsed.as_secs_f64()
    )]
    Timeout {
        handle: JobHandle,
        last_status: JobStatus,
        attempts: u32,
        elapsed: Duration,
        budget: Duration,
    },

    /// The caller cancelled the job
    #[error("task {handle} cancelled after {attempts} attempts")]
    Cancelled { handle: JobHandle, attempts: u32 },
}

/// Discriminant of [`JobError`], convenient for matching and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobErrorKind {
    InvalidBudget,
    Submit,
    StatusFetchFailed,
    JobFailed,
    Timeout,
    Cancelled,
}

impl JobError {
    pub fn kind(&self) -> JobErrorKind {
        match self {
            JobError::InvalidBudget => JobErrorKind::InvalidBudget,
            JobError::Submit(_) => JobErrorKind::Submit,
            JobError::StatusFetchFailed { .. } => JobErrorKind::StatusFetchFailed,
            JobError::JobFailed { .. } => JobErrorKind::JobFailed,
            JobError::Timeout { .. } => JobErrorKind::Timeout,
            JobError::Cancelled { .. } => JobErrorKind::Cancelled,
        }
    }

    /// Task the error refers to, when one was created
    pub fn handle(&self) -> Option<&JobHandle> {
        match self {
            JobError::StatusFetchFailed { handle, .. }
            | JobError::JobFailed { handle, .. }
            | JobError::Timeout { handle, .. }
            | JobError::Cancelled { handle, .. } => Some(handle),
            JobError::InvalidBudget | JobError::Submit(_) => None,
        }
    }

    /// Underlying HTTP error, for submit and fetch failures
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            JobError::Submit(source) | JobError::StatusFetchFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_includes_diagnostics() {
        let err = JobError::Timeout {
            handle: JobHandle::new("t-9"),
            last_status: JobStatus::Pending,
            attempts: 12,
            elapsed: Duration::from_millis(61_500),
            budget: Duration::from_secs(60),
        };
        assert_eq!(
            err.to_string(),
            "task t-9 timed out after 12 attempts (61.5s), last status PENDING"
        );
        assert_eq!(err.kind(), JobErrorKind::Timeout);
        assert_eq!(err.handle(), Some(&JobHandle::new("t-9")));
    }

    #[test]
    fn test_client_error_access() {
        let err = JobError::Submit(ClientError::api_error(401, "bad token"));
        assert_eq!(err.client_error().and_then(|e| e.status()), Some(401));
        assert!(err.handle().is_none());
    }
}
