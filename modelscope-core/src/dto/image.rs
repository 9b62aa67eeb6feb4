//! Image generation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::{Artifacts, JobRequest, JobStatus, TaskSnapshot};

/// Body of `POST /images/generations`
///
/// Optional fields are left out of the JSON when empty or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f32>,
}

impl From<&JobRequest> for GenerationRequest {
    fn from(request: &JobRequest) -> Self {
        Self {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            negative_prompt: request
                .negative_prompt
                .clone()
                .filter(|text| !text.trim().is_empty()),
            size: Some(request.size.to_wire()).filter(|size| !size.is_empty()),
            num_inference_steps: Some(request.steps).filter(|steps| *steps > 0),
            guidance_scale: Some(request.guidance_scale).filter(|scale| *scale > 0.0),
        }
    }
}

/// Response of `POST /images/generations`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResult {
    pub task_id: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Response of `GET /tasks/{task_id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResult {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(alias = "status")]
    pub task_status: JobStatus,
    #[serde(default)]
    pub output_images: Vec<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl From<StatusResult> for TaskSnapshot {
    fn from(result: StatusResult) -> Self {
        Self {
            status: result.task_status,
            artifacts: Artifacts::new(result.output_images),
            error_message: result.error_message.filter(|msg| !msg.trim().is_empty()),
        }
    }
}
