//! Model catalog
//!
//! Supported models per capability, the image sizes offered to callers and
//! the canned prompt templates for chat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

pub const LLM_MODELS: &[&str] = &[
    "ZhipuAI/GLM-4.6",
    "ZhipuAI/GLM-4.5",
    "deepseek-ai/DeepSeek-V3.1",
    "deepseek-ai/DeepSeek-R1-0528",
    "Qwen/Qwen3-235B-A22B-Instruct-2507",
    "Qwen/Qwen3-235B-A22B-Thinking-2507",
    "Qwen/Qwen3-Next-80B-A3B-Instruct",
    "Qwen/Qwen3-Coder-480B-A35B-Instruct",
    "Qwen/Qwen3-Next-80B-A3B-Thinking",
];

pub const VISION_MODELS: &[&str] = &[
    "Qwen/Qwen3-VL-235B-A22B-Instruct",
    "Qwen/Qwen3-VL-30B-A3B-Instruct",
];

pub const IMAGE_MODELS: &[&str] = &["Qwen/Qwen-Image"];

pub const EMBEDDING_MODELS: &[&str] = &["Qwen/Qwen3-Embedding-8B"];

pub const IMAGE_SIZES: &[&str] = &["1024x1024", "1024x768", "768x1024", "1152x896", "896x1152"];

/// Capability a model is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Llm,
    Vision,
    Image,
    Embedding,
}

impl ModelKind {
    pub fn models(self) -> &'static [&'static str] {
        match self {
            ModelKind::Llm => LLM_MODELS,
            ModelKind::Vision => VISION_MODELS,
            ModelKind::Image => IMAGE_MODELS,
            ModelKind::Embedding => EMBEDDING_MODELS,
        }
    }

    /// First listed model, used when the caller does not pick one
    pub fn default_model(self) -> &'static str {
        self.models()[0]
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Llm => "llm",
            ModelKind::Vision => "vision",
            ModelKind::Image => "image",
            ModelKind::Embedding => "embedding",
        };
        f.write_str(name)
    }
}

/// Rejects a model that is not listed for `kind`
pub fn validate_model(kind: ModelKind, model: &str) -> Result<(), CoreError> {
    if kind.models().contains(&model) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedModel {
            kind,
            model: model.to_string(),
        })
    }
}

/// A chat model offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub name: String,
    pub id: String,
}

/// Searches the chat models by id or display name, case-insensitively
///
/// Results are sorted by display name. An empty filter returns everything.
pub fn search_models(filter: Option<&str>) -> Vec<ModelOption> {
    let needle = filter.map(str::to_lowercase).unwrap_or_default();

    let mut options: Vec<ModelOption> = LLM_MODELS
        .iter()
        .map(|id| ModelOption {
            name: display_name(id).to_string(),
            id: id.to_string(),
        })
        .filter(|option| {
            needle.is_empty()
                || option.id.to_lowercase().contains(&needle)
                || option.name.to_lowercase().contains(&needle)
        })
        .collect();

    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

/// Model id without its organisation prefix
pub fn display_name(id: &str) -> &str {
    id.rsplit_once('/').map(|(_, name)| name).unwrap_or(id)
}

/// Canned prefix for the first user message of a chat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTemplate {
    #[default]
    Custom,
    Code,
    Analysis,
    Translation,
}

impl MessageTemplate {
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            MessageTemplate::Custom => None,
            MessageTemplate::Code => Some("Please write code for the following functionality:"),
            MessageTemplate::Analysis => Some("Please analyse the following text:"),
            MessageTemplate::Translation => Some("Please translate the following into Chinese:"),
        }
    }

    /// Prepends the template prefix to `content`
    pub fn apply(self, content: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}\n{}", prefix, content),
            None => content.to_string(),
        }
    }
}

impl FromStr for MessageTemplate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(MessageTemplate::Custom),
            "code" => Ok(MessageTemplate::Code),
            "analysis" => Ok(MessageTemplate::Analysis),
            "translation" => Ok(MessageTemplate::Translation),
            _ => Err(CoreError::InvalidTemplate(s.to_string())),
        }
    }
}
