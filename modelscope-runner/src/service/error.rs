//! Errors returned by runner operations

use modelscope_client::ClientError;
use modelscope_core::CoreError;
use thiserror::Error;

use crate::scheduler::JobError;

/// Input rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("image URL cannot be empty")]
    EmptyImageUrl,

    #[error("at least one non-empty message is required")]
    EmptyMessages,

    #[error("input text cannot be empty")]
    EmptyInput,

    #[error("batch input needs at least one non-empty text")]
    EmptyBatch,

    #[error("timeout of {0} minutes is out of range")]
    InvalidTimeout(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Failure of a single operation
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("failed to encode result: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<CoreError> for OperationError {
    fn from(err: CoreError) -> Self {
        OperationError::Validation(ValidationError::Core(err))
    }
}

impl OperationError {
    /// HTTP error behind this failure, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            OperationError::Client(err) => Some(err),
            OperationError::Job(err) => err.client_error(),
            OperationError::Validation(_) | OperationError::Output(_) => None,
        }
    }
}
