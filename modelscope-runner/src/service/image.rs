//! Image generation service
//!
//! Submits a text-to-image job and drives it to completion with the
//! [`JobPoller`]. Submission errors are returned immediately; nothing is
//! polled for a job that was never created.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use modelscope_client::InferenceClient;
use modelscope_core::domain::job::JobRequest;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::PollPolicy;
use crate::repository::{HttpTaskRepository, JobSubmitter};
use crate::scheduler::{JobError, JobPoller};
use crate::service::error::{OperationError, ValidationError};

/// Result record of a finished image job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeneration {
    pub task_id: String,
    pub status: String,
    pub progress: u8,
    pub model: String,
    pub prompt: String,
    pub negative_prompt: String,
    pub size: String,
    pub steps: u32,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub processing_time_secs: u64,
    pub attempts_used: u32,
}

/// Runs text-to-image jobs end to end
#[derive(Clone)]
pub struct ImageService {
    submitter: Arc<dyn JobSubmitter>,
    poller: JobPoller,
}

impl ImageService {
    pub fn new(submitter: Arc<dyn JobSubmitter>, poller: JobPoller) -> Self {
        Self { submitter, poller }
    }

    /// Wires the service to the HTTP task endpoints
    pub fn from_client(client: InferenceClient, policy: PollPolicy) -> Self {
        let repository = Arc::new(HttpTaskRepository::new(client));
        let poller = JobPoller::new(repository.clone(), policy);
        Self::new(repository, poller)
    }

    /// Replaces the poller, e.g. to attach a progress observer
    pub fn with_poller(mut self, poller: JobPoller) -> Self {
        self.poller = poller;
        self
    }

    pub async fn generate(&self, request: JobRequest) -> Result<ImageGeneration, OperationError> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Generates images, giving up when `cancel` fires
    pub async fn generate_with_cancel(
        &self,
        request: JobRequest,
        cancel: &CancellationToken,
    ) -> Result<ImageGeneration, OperationError> {
        if request.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        let started = Instant::now();
        let handle = self
            .submitter
            .submit(&request)
            .await
            .map_err(JobError::Submit)?;

        info!(
            "Image task {} submitted (model: {}, size: {})",
            handle, request.model, request.size
        );

        let completion = self.poller.poll(&handle, request.timeout, cancel).await?;
        let processing_time = started.elapsed();

        Ok(ImageGeneration {
            task_id: handle.as_str().to_string(),
            status: "completed".to_string(),
            progress: 100,
            model: request.model,
            prompt: request.prompt,
            negative_prompt: request.negative_prompt.unwrap_or_default(),
            size: request.size.to_wire(),
            steps: request.steps,
            images: completion.artifacts.into_images(),
            created_at: Utc::now(),
            processing_time_secs: processing_time.as_secs_f64().round() as u64,
            attempts_used: completion.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StatusFetcher;
    use crate::scheduler::JobErrorKind;
    use async_trait::async_trait;
    use modelscope_client::ClientError;
    use modelscope_core::domain::job::{JobHandle, JobStatus, TaskSnapshot};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct FakeTasks {
        submit_error: Option<u16>,
        statuses: Mutex<VecDeque<TaskSnapshot>>,
        submits: AtomicU32,
        fetches: AtomicU32,
    }

    #[async_trait]
    impl JobSubmitter for FakeTasks {
        async fn submit(&self, _request: &JobRequest) -> Result<JobHandle, ClientError> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            match self.submit_error {
                Some(status) => Err(ClientError::api_error(status, "rejected")),
                None => Ok(JobHandle::new("task-42")),
            }
        }
    }

    #[async_trait]
    impl StatusFetcher for FakeTasks {
        async fn fetch_status(&self, _handle: &JobHandle) -> Result<TaskSnapshot, ClientError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let next = self.statuses.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(|| TaskSnapshot::new(JobStatus::Running)))
        }
    }

    fn service(tasks: Arc<FakeTasks>) -> ImageService {
        let poller = JobPoller::new(tasks.clone(), PollPolicy::default());
        ImageService::new(tasks, poller)
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_builds_result_record() {
        let tasks = Arc::new(FakeTasks {
            statuses: Mutex::new(VecDeque::from(vec![
                TaskSnapshot::new(JobStatus::Pending),
                TaskSnapshot::succeeded(vec!["https://cdn/img1.png".to_string()]),
            ])),
            ..Default::default()
        });

        let result = service(tasks.clone())
            .generate(JobRequest::new("a red fox").with_negative_prompt("blurry"))
            .await
            .unwrap();

        assert_eq!(result.task_id, "task-42");
        assert_eq!(result.status, "completed");
        assert_eq!(result.progress, 100);
        assert_eq!(result.model, "Qwen/Qwen-Image");
        assert_eq!(result.negative_prompt, "blurry");
        assert_eq!(result.size, "1024x1024");
        assert_eq!(result.steps, 30);
        assert_eq!(result.images, vec!["https://cdn/img1.png"]);
        assert_eq!(result.attempts_used, 2);
        assert_eq!(result.processing_time_secs, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_prompt_is_rejected_before_submit() {
        let tasks = Arc::new(FakeTasks::default());

        let err = service(tasks.clone())
            .generate(JobRequest::new("   "))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OperationError::Validation(ValidationError::EmptyPrompt)
        ));
        assert_eq!(tasks.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_error_skips_polling() {
        let tasks = Arc::new(FakeTasks {
            submit_error: Some(401),
            ..Default::default()
        });

        let err = service(tasks.clone())
            .generate(JobRequest::new("a cat"))
            .await
            .unwrap_err();

        match err {
            OperationError::Job(job) => {
                assert_eq!(job.kind(), JobErrorKind::Submit);
                assert!(job.client_error().unwrap().is_unauthorized());
            }
            other => panic!("expected job error, got {other:?}"),
        }
        assert_eq!(tasks.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_generation() {
        let tasks = Arc::new(FakeTasks::default());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = service(tasks)
            .generate_with_cancel(JobRequest::new("a cat"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OperationError::Job(JobError::Cancelled { attempts: 1, .. })
        ));
    }
}
