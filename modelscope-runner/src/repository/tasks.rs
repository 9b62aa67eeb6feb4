//! Image task repository
//!
//! Handles communication with the inference API for image jobs:
//! - Submitting a generation request
//! - Reading the current state of a task

use async_trait::async_trait;
use modelscope_client::{ClientError, InferenceClient};
use modelscope_core::domain::job::{JobHandle, JobRequest, TaskSnapshot};
use modelscope_core::dto::image::GenerationRequest;
use tracing::debug;

/// Creates server-side image tasks
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submits a generation request
    ///
    /// # Returns
    /// The handle of the created task
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError>;
}

/// Reads the state of server-side image tasks
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetches the current status of a task
    ///
    /// # Arguments
    /// * `handle` - The task to inspect
    async fn fetch_status(&self, handle: &JobHandle) -> Result<TaskSnapshot, ClientError>;
}

/// HTTP implementation of both image task traits
#[derive(Debug, Clone)]
pub struct HttpTaskRepository {
    client: InferenceClient,
}

impl HttpTaskRepository {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSubmitter for HttpTaskRepository {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ClientError> {
        let body = GenerationRequest::from(request);
        let handle = self.client.submit_image_job(&body).await?;
        debug!("Submitted image task {} (model {})", handle, request.model);
        Ok(handle)
    }
}

#[async_trait]
impl StatusFetcher for HttpTaskRepository {
    async fn fetch_status(&self, handle: &JobHandle) -> Result<TaskSnapshot, ClientError> {
        let result = self.client.fetch_task_status(handle).await?;
        Ok(TaskSnapshot::from(result))
    }
}
