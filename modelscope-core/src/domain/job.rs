//! Image generation job types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

/// Default text-to-image model
pub const DEFAULT_IMAGE_MODEL: &str = "Qwen/Qwen-Image";

/// Default output size token
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Default number of inference steps
pub const DEFAULT_STEPS: u32 = 30;

/// Guidance scale sent with every generation request
pub const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;

/// Default wall-clock budget for one job
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Output size of a generated image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSize {
    /// Explicit pixel dimensions, sent as `WxH`
    Dimensions { width: u32, height: u32 },
    /// Size token passed to the server verbatim
    Named(String),
}

impl ImageSize {
    /// Creates a size from pixel dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self::Dimensions { width, height }
    }

    /// The value sent in the `size` request field
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(1024, 1024)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Dimensions { width, height } => write!(f, "{}x{}", width, height),
            ImageSize::Named(token) => write!(f, "{}", token),
        }
    }
}

impl FromStr for ImageSize {
    type Err = CoreError;

    /// Parses `WxH` into dimensions; any other non-empty token is kept as a named size
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidSize(s.to_string()));
        }

        if let Some((w, h)) = trimmed.split_once(['x', 'X', '*']) {
            if let (Ok(width), Ok(height)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
                if width == 0 || height == 0 {
                    return Err(CoreError::InvalidSize(s.to_string()));
                }
                return Ok(Self::Dimensions { width, height });
            }
        }

        Ok(Self::Named(trimmed.to_string()))
    }
}

/// Caller-supplied parameters of one text-to-image job
///
/// Immutable once handed to a submitter; the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub model: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub size: ImageSize,
    pub steps: u32,
    pub guidance_scale: f32,
    /// Wall-clock budget for polling the job to completion
    pub timeout: Duration,
}

impl JobRequest {
    /// Creates a request for `prompt` with the default model and settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_IMAGE_MODEL.to_string(),
            prompt: prompt.into(),
            negative_prompt: None,
            size: ImageSize::default(),
            steps: DEFAULT_STEPS,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the negative prompt; blank text clears it
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        let negative_prompt = negative_prompt.into();
        self.negative_prompt = if negative_prompt.trim().is_empty() {
            None
        } else {
            Some(negative_prompt)
        };
        self
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_guidance_scale(mut self, guidance_scale: f32) -> Self {
        self.guidance_scale = guidance_scale;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Server-assigned identifier of a submitted job
///
/// Opaque to this crate; only the submit response produces one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self(task_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status reported by the task endpoint
///
/// Strings the server may add later are preserved in `Unknown` and treated
/// as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown(String),
}

impl JobStatus {
    /// Returns true when no further transition can occur
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => JobStatus::Pending,
            "RUNNING" => JobStatus::Running,
            // the task endpoint spells success "SUCCEED"
            "SUCCEEDED" | "SUCCEED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Unknown(raw),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::from(raw.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output image references of a finished job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifacts(Vec<String>);

impl Artifacts {
    pub fn new(images: Vec<String>) -> Self {
        Self(images)
    }

    pub fn images(&self) -> &[String] {
        &self.0
    }

    pub fn into_images(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Artifacts {
    fn from(images: Vec<String>) -> Self {
        Self(images)
    }
}

/// One observation of a job's server-side state
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub status: JobStatus,
    /// Populated once the job succeeded
    pub artifacts: Artifacts,
    /// Populated when the job failed, if the server supplied a reason
    pub error_message: Option<String>,
}

impl TaskSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            artifacts: Artifacts::default(),
            error_message: None,
        }
    }

    pub fn succeeded(images: Vec<String>) -> Self {
        Self {
            status: JobStatus::Succeeded,
            artifacts: Artifacts::new(images),
            error_message: None,
        }
    }

    pub fn failed(error_message: Option<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            artifacts: Artifacts::default(),
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(JobStatus::from("PENDING"), JobStatus::Pending);
        assert_eq!(JobStatus::from("RUNNING"), JobStatus::Running);
        assert_eq!(JobStatus::from("SUCCEEDED"), JobStatus::Succeeded);
        assert_eq!(JobStatus::from("SUCCEED"), JobStatus::Succeeded);
        assert_eq!(JobStatus::from("FAILED"), JobStatus::Failed);
        assert_eq!(
            JobStatus::from("PROCESSING"),
            JobStatus::Unknown("PROCESSING".to_string())
        );
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        assert!(!JobStatus::from("QUEUED_REMOTE").is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_deserializes_from_json_string() {
        let status: JobStatus = serde_json::from_str("\"SUCCEED\"").unwrap();
        assert_eq!(status, JobStatus::Succeeded);

        let unknown: JobStatus = serde_json::from_str("\"WARMING_UP\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"WARMING_UP\"");
    }

    #[test]
    fn test_size_parsing() {
        assert_eq!("768x1024".parse::<ImageSize>().unwrap(), ImageSize::new(768, 1024));
        assert_eq!(
            "square_hd".parse::<ImageSize>().unwrap(),
            ImageSize::Named("square_hd".to_string())
        );
        assert!("".parse::<ImageSize>().is_err());
        assert!("0x512".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::new(1152, 896).to_wire(), "1152x896");
    }

    #[test]
    fn test_request_defaults() {
        let request = JobRequest::new("a cat in a garden");
        assert_eq!(request.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(request.size.to_wire(), DEFAULT_IMAGE_SIZE);
        assert_eq!(request.steps, 30);
        assert_eq!(request.timeout, Duration::from_secs(300));
        assert!(request.negative_prompt.is_none());
    }

    #[test]
    fn test_blank_negative_prompt_is_dropped() {
        let request = JobRequest::new("a cat").with_negative_prompt("   ");
        assert!(request.negative_prompt.is_none());

        let request = JobRequest::new("a cat").with_negative_prompt("blurry");
        assert_eq!(request.negative_prompt.as_deref(), Some("blurry"));
    }
}
