//! Image generation endpoints

use crate::InferenceClient;
use crate::error::Result;
use modelscope_core::domain::job::JobHandle;
use modelscope_core::dto::image::{GenerationRequest, StatusResult, SubmitResult};

/// Header that switches `/images/generations` to task mode
const ASYNC_MODE_HEADER: &str = "X-ModelScope-Async-Mode";

/// Header naming the task family on `/tasks/{id}`
const TASK_TYPE_HEADER: &str = "X-ModelScope-Task-Type";

impl InferenceClient {
    // =============================================================================
    // Image Generation
    // =============================================================================

    /// Submit a text-to-image job
    ///
    /// The request is sent in asynchronous mode; the server answers right
    /// away with a task id that must be polled with
    /// [`fetch_task_status`](Self::fetch_task_status).
    ///
    /// # Returns
    /// The handle of the created task
    pub async fn submit_image_job(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let response = self
            .post("images/generations")
            .header(ASYNC_MODE_HEADER, "true")
            .json(request)
            .send()
            .await?;

        let submitted: SubmitResult = self.handle_response(response).await?;
        Ok(JobHandle::new(submitted.task_id))
    }

    /// Fetch the current status of an image generation task
    ///
    /// # Arguments
    /// * `handle` - The task handle returned by [`submit_image_job`](Self::submit_image_job)
    pub async fn fetch_task_status(&self, handle: &JobHandle) -> Result<StatusResult> {
        let response = self
            .get(&format!("tasks/{}", handle.as_str()))
            .header(TASK_TYPE_HEADER, "image_generation")
            .send()
            .await?;

        self.handle_response(response).await
    }
}
