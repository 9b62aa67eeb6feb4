//! Chat and vision service

use chrono::{DateTime, Utc};
use modelscope_client::InferenceClient;
use modelscope_core::catalog::{MessageTemplate, ModelKind};
use modelscope_core::domain::chat::{ChatMessage, MessageContent, Role};
use modelscope_core::dto::chat::{ChatCompletion, ChatCompletionRequest};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info};

use crate::service::error::{OperationError, ValidationError};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_VISION_PROMPT: &str = "Describe the content of this image";

fn default_llm_model() -> String {
    ModelKind::Llm.default_model().to_string()
}

fn default_vision_model() -> String {
    ModelKind::Vision.default_model().to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_vision_prompt() -> String {
    DEFAULT_VISION_PROMPT.to_string()
}

/// Parameters of a chat completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatParams {
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Prefix applied to the first user message
    #[serde(default)]
    pub template: MessageTemplate,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ChatParams {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: default_llm_model(),
            messages,
            template: MessageTemplate::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Parameters of a vision chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionParams {
    #[serde(default = "default_vision_model")]
    pub model: String,
    pub image_url: String,
    #[serde(default = "default_vision_prompt")]
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl VisionParams {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            model: default_vision_model(),
            image_url: image_url.into(),
            prompt: default_vision_prompt(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Chat completion plus timing and token metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    #[serde(flatten)]
    pub completion: ChatCompletion,
    pub status: String,
    pub processing_time_secs: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatService {
    client: InferenceClient,
}

impl ChatService {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    /// Runs a chat completion
    pub async fn complete(&self, params: ChatParams) -> Result<ChatResult, OperationError> {
        let started = Instant::now();
        let messages = prepare_messages(params.messages, params.template)?;

        info!(
            "Starting chat completion (model: {}, messages: {})",
            params.model,
            messages.len()
        );

        let request = ChatCompletionRequest::new(params.model, messages)
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens);

        let completion = match self.client.chat_completion(&request).await {
            Ok(completion) => completion,
            Err(e) => {
                error!(
                    "Chat completion failed after {}s: {}",
                    started.elapsed().as_secs(),
                    e
                );
                return Err(e.into());
            }
        };

        let usage = completion.usage.unwrap_or_default();
        let processing_time_secs = started.elapsed().as_secs_f64().round() as u64;
        info!(
            "Chat completion finished in {}s ({} tokens)",
            processing_time_secs, usage.total_tokens
        );

        Ok(ChatResult {
            completion,
            status: "completed".to_string(),
            processing_time_secs,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            completed_at: Utc::now(),
        })
    }

    /// Asks a vision model about one image
    pub async fn vision(&self, params: VisionParams) -> Result<ChatCompletion, OperationError> {
        if params.image_url.trim().is_empty() {
            return Err(ValidationError::EmptyImageUrl.into());
        }
        if params.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        info!("Starting vision chat (model: {})", params.model);

        let message = ChatMessage::user_with_image(params.prompt, params.image_url);
        let request = ChatCompletionRequest::new(params.model, vec![message])
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens);

        Ok(self.client.chat_completion(&request).await?)
    }
}

/// Checks that some message has text and applies the template prefix
fn prepare_messages(
    mut messages: Vec<ChatMessage>,
    template: MessageTemplate,
) -> Result<Vec<ChatMessage>, ValidationError> {
    if !messages.iter().any(|message| message.content.has_text()) {
        return Err(ValidationError::EmptyMessages);
    }

    if template.prefix().is_some() {
        let first_user = messages
            .iter_mut()
            .filter(|message| message.role == Role::User)
            .find_map(|message| match &mut message.content {
                MessageContent::Text(text) => Some(text),
                MessageContent::Parts(_) => None,
            });
        if let Some(text) = first_user {
            *text = template.apply(text);
        }
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_rejects_blank_conversation() {
        let messages = vec![ChatMessage::system("  "), ChatMessage::user("")];
        assert_eq!(
            prepare_messages(messages, MessageTemplate::Custom),
            Err(ValidationError::EmptyMessages)
        );
        assert_eq!(
            prepare_messages(Vec::new(), MessageTemplate::Custom),
            Err(ValidationError::EmptyMessages)
        );
    }

    #[test]
    fn test_template_applies_to_first_user_message_only() {
        let messages = vec![
            ChatMessage::system("You are helpful."),
            ChatMessage::user("sort a list"),
            ChatMessage::user("in rust"),
        ];
        let prepared = prepare_messages(messages, MessageTemplate::Code).unwrap();

        assert_eq!(prepared[0], ChatMessage::system("You are helpful."));
        assert_eq!(
            prepared[1].content,
            MessageContent::Text(MessageTemplate::Code.apply("sort a list"))
        );
        assert_eq!(prepared[2], ChatMessage::user("in rust"));
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: ChatParams = serde_json::from_value(json!({
            "messages": [{ "role": "user", "content": "hi" }]
        }))
        .unwrap();
        assert_eq!(params.model, ModelKind::Llm.default_model());
        assert_eq!(params.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(params.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(params.template, MessageTemplate::Custom);

        let vision: VisionParams =
            serde_json::from_value(json!({ "image_url": "https://x/cat.png" })).unwrap();
        assert_eq!(vision.prompt, DEFAULT_VISION_PROMPT);
        assert_eq!(vision.model, ModelKind::Vision.default_model());
    }
}
