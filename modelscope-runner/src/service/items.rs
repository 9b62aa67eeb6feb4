//! Work item executor
//!
//! A work item is one tagged operation (`{"operation": "text_to_image", ...}`).
//! Items run one after another; each produces a JSON result record. With
//! `continue_on_fail`, a failing item yields `{"error": <message>}` and the
//! batch moves on, otherwise the first failure stops the batch.

use std::time::Duration;

use modelscope_client::{ClientError, InferenceClient};
use modelscope_core::catalog::ModelKind;
use modelscope_core::domain::job::{
    DEFAULT_GUIDANCE_SCALE, DEFAULT_IMAGE_SIZE, DEFAULT_STEPS, ImageSize, JobRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RunnerConfig;
use crate::service::chat::{ChatParams, ChatService, VisionParams};
use crate::service::embedding::{EmbeddingParams, EmbeddingService};
use crate::service::error::{OperationError, ValidationError};
use crate::service::image::ImageService;
use crate::service::messages::{Locale, describe_error};

fn default_image_model() -> String {
    ModelKind::Image.default_model().to_string()
}

fn default_image_size() -> String {
    DEFAULT_IMAGE_SIZE.to_string()
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

fn default_guidance_scale() -> f32 {
    DEFAULT_GUIDANCE_SCALE
}

/// Parameters of a text-to-image item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageParams {
    #[serde(default = "default_image_model")]
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(default = "default_image_size")]
    pub size: String,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
    /// Wall-clock budget; the runner default applies when absent
    #[serde(default)]
    pub timeout_minutes: Option<f64>,
}

impl ImageParams {
    /// Converts into a job request, using `default_timeout` when no budget is set
    pub fn into_request(self, default_timeout: Duration) -> Result<JobRequest, OperationError> {
        let size: ImageSize = self.size.parse()?;
        let timeout = match self.timeout_minutes {
            Some(minutes) if minutes > 0.0 => Duration::try_from_secs_f64(minutes * 60.0)
                .map_err(|_| ValidationError::InvalidTimeout(minutes.to_string()))?,
            Some(_) => Duration::ZERO,
            None => default_timeout,
        };

        Ok(JobRequest::new(self.prompt)
            .with_model(self.model)
            .with_negative_prompt(self.negative_prompt)
            .with_size(size)
            .with_steps(self.steps)
            .with_guidance_scale(self.guidance_scale)
            .with_timeout(timeout))
    }
}

/// One unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    TextToImage(ImageParams),
    ChatCompletion(ChatParams),
    VisionChat(VisionParams),
    CreateEmbedding(EmbeddingParams),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::TextToImage(_) => "text_to_image",
            Operation::ChatCompletion(_) => "chat_completion",
            Operation::VisionChat(_) => "vision_chat",
            Operation::CreateEmbedding(_) => "create_embedding",
        }
    }
}

/// Result of one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutput {
    /// Zero-based position of the item in the batch
    pub item: usize,
    pub json: JsonValue,
}

/// Failure that stopped a batch
#[derive(Debug, Error)]
#[error("item {item} failed: {message}")]
pub struct ItemError {
    pub item: usize,
    /// Localized message
    pub message: String,
    #[source]
    pub source: OperationError,
}

/// Dispatches operations to the matching service
#[derive(Clone)]
pub struct OperationRunner {
    image: ImageService,
    chat: ChatService,
    embedding: EmbeddingService,
    image_timeout: Duration,
}

impl OperationRunner {
    pub fn new(
        image: ImageService,
        chat: ChatService,
        embedding: EmbeddingService,
        image_timeout: Duration,
    ) -> Self {
        Self {
            image,
            chat,
            embedding,
            image_timeout,
        }
    }

    /// Builds every service on top of one HTTP client
    pub fn from_config(config: &RunnerConfig) -> Result<Self, ClientError> {
        let client = InferenceClient::new(config.client_config())?;
        Ok(Self::new(
            ImageService::from_client(client.clone(), config.poll),
            ChatService::new(client.clone()),
            EmbeddingService::new(client),
            config.image_timeout,
        ))
    }

    pub fn image(&self) -> &ImageService {
        &self.image
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    pub fn embedding(&self) -> &EmbeddingService {
        &self.embedding
    }

    /// Runs a single operation and returns its result record
    pub async fn execute(&self, operation: Operation) -> Result<JsonValue, OperationError> {
        let value = match operation {
            Operation::TextToImage(params) => {
                let request = params.into_request(self.image_timeout)?;
                serde_json::to_value(self.image.generate(request).await?)?
            }
            Operation::ChatCompletion(params) => {
                serde_json::to_value(self.chat.complete(params).await?)?
            }
            Operation::VisionChat(params) => serde_json::to_value(self.chat.vision(params).await?)?,
            Operation::CreateEmbedding(params) => {
                serde_json::to_value(self.embedding.embed(params).await?)?
            }
        };
        Ok(value)
    }

    /// Runs items in order
    ///
    /// # Arguments
    /// * `continue_on_fail` - Record failures as `{"error": ...}` instead of stopping
    /// * `locale` - Language of recorded error messages
    pub async fn execute_items(
        &self,
        items: Vec<Operation>,
        continue_on_fail: bool,
        locale: Locale,
    ) -> Result<Vec<ItemOutput>, ItemError> {
        let total = items.len();
        let mut outputs = Vec::with_capacity(total);

        for (item, operation) in items.into_iter().enumerate() {
            info!("Running item {}/{} ({})", item + 1, total, operation.name());

            match self.execute(operation).await {
                Ok(json) => outputs.push(ItemOutput { item, json }),
                Err(source) => {
                    let message = describe_error(&source, locale);
                    if !continue_on_fail {
                        return Err(ItemError {
                            item,
                            message,
                            source,
                        });
                    }
                    warn!("Item {} failed, continuing: {}", item, message);
                    outputs.push(ItemOutput {
                        item,
                        json: json!({ "error": message }),
                    });
                }
            }
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_tagging() {
        let items: Vec<Operation> = serde_json::from_value(json!([
            { "operation": "text_to_image", "prompt": "a fox", "timeout_minutes": 2 },
            { "operation": "chat_completion", "messages": [{ "role": "user", "content": "hi" }] },
            { "operation": "vision_chat", "image_url": "https://x/y.png" },
            { "operation": "create_embedding", "input": "hello" }
        ]))
        .unwrap();

        let names: Vec<&str> = items.iter().map(Operation::name).collect();
        assert_eq!(
            names,
            ["text_to_image", "chat_completion", "vision_chat", "create_embedding"]
        );
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        let parsed = serde_json::from_value::<Operation>(json!({ "operation": "speech" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_image_params_into_request() {
        let params: ImageParams = serde_json::from_value(json!({
            "prompt": "a fox",
            "size": "768x1024",
            "timeout_minutes": 1.5
        }))
        .unwrap();

        let request = params.into_request(Duration::from_secs(300)).unwrap();
        assert_eq!(request.model, "Qwen/Qwen-Image");
        assert_eq!(request.size, ImageSize::new(768, 1024));
        assert_eq!(request.steps, DEFAULT_STEPS);
        assert_eq!(request.negative_prompt, None);
        assert_eq!(request.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_image_params_default_timeout_and_bad_size() {
        let params: ImageParams = serde_json::from_value(json!({ "prompt": "a fox" })).unwrap();
        let request = params.clone().into_request(Duration::from_secs(120)).unwrap();
        assert_eq!(request.timeout, Duration::from_secs(120));

        let bad = ImageParams {
            size: "0x512".to_string(),
            ..params
        };
        assert!(matches!(
            bad.into_request(Duration::from_secs(120)),
            Err(OperationError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_timeout_is_a_validation_error() {
        let params: ImageParams =
            serde_json::from_value(json!({ "prompt": "a fox", "timeout_minutes": 1e300 })).unwrap();
        assert_eq!(
            params.into_request(Duration::from_secs(120)).unwrap_err().to_string(),
            ValidationError::InvalidTimeout(1e300_f64.to_string()).to_string()
        );

        let params: ImageParams =
            serde_json::from_value(json!({ "prompt": "a fox", "timeout_minutes": 0.0 })).unwrap();
        let request = params.into_request(Duration::from_secs(120)).unwrap();
        assert_eq!(request.timeout, Duration::ZERO);
    }
}
