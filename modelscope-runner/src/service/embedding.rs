//! Embedding service

use chrono::{DateTime, Utc};
use modelscope_client::InferenceClient;
use modelscope_core::catalog::ModelKind;
use modelscope_core::domain::embedding::{EmbeddingInput, EncodingFormat};
use modelscope_core::dto::embedding::{EmbeddingData, EmbeddingRequest, EmbeddingUsage};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{error, info};

use crate::service::error::{OperationError, ValidationError};

fn default_embedding_model() -> String {
    ModelKind::Embedding.default_model().to_string()
}

/// Parameters of an embedding request
///
/// `input` is either one string or an array of strings; an array is sent
/// as a batch with blank entries removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingParams {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    pub input: EmbeddingInput,
    #[serde(default)]
    pub encoding_format: EncodingFormat,
}

impl EmbeddingParams {
    pub fn new(input: EmbeddingInput) -> Self {
        Self {
            model: default_embedding_model(),
            input,
            encoding_format: EncodingFormat::default(),
        }
    }
}

/// Embedding response plus timing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    pub id: Option<String>,
    pub object: String,
    pub model: String,
    pub data: Vec<EmbeddingData>,
    pub usage: Option<EmbeddingUsage>,
    pub status: String,
    pub processing_time_secs: u64,
    pub completed_at: DateTime<Utc>,
    pub encoding_format: EncodingFormat,
    pub batch: bool,
}

#[derive(Debug, Clone)]
pub struct EmbeddingService {
    client: InferenceClient,
}

impl EmbeddingService {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub async fn embed(&self, params: EmbeddingParams) -> Result<EmbeddingResult, OperationError> {
        let started = Instant::now();
        let input = normalize_input(params.input)?;
        let batch = input.is_batch();

        info!(
            "Creating embedding (model: {}, batch: {}, format: {})",
            params.model, batch, params.encoding_format
        );

        let request = EmbeddingRequest {
            model: params.model,
            input,
            encoding_format: params.encoding_format,
        };

        let response = self.client.create_embedding(&request).await.map_err(|e| {
            error!(
                "Embedding failed after {}s: {}",
                started.elapsed().as_secs(),
                e
            );
            e
        })?;

        Ok(EmbeddingResult {
            id: response.id,
            object: response.object,
            model: response.model,
            data: response.data,
            usage: response.usage,
            status: "completed".to_string(),
            processing_time_secs: started.elapsed().as_secs_f64().round() as u64,
            completed_at: Utc::now(),
            encoding_format: params.encoding_format,
            batch,
        })
    }
}

fn normalize_input(input: EmbeddingInput) -> Result<EmbeddingInput, ValidationError> {
    match input {
        EmbeddingInput::Single(text) if text.trim().is_empty() => Err(ValidationError::EmptyInput),
        EmbeddingInput::Single(text) => Ok(EmbeddingInput::Single(text)),
        EmbeddingInput::Batch(texts) => {
            let batch = EmbeddingInput::batch(texts);
            if batch.is_blank() {
                Err(ValidationError::EmptyBatch)
            } else {
                Ok(batch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_single() {
        assert_eq!(
            normalize_input(EmbeddingInput::Single(" \n".to_string())),
            Err(ValidationError::EmptyInput)
        );
        assert_eq!(
            normalize_input(EmbeddingInput::Single("hello".to_string())),
            Ok(EmbeddingInput::Single("hello".to_string()))
        );
    }

    #[test]
    fn test_normalize_batch_drops_blanks() {
        let input = EmbeddingInput::Batch(vec!["a".into(), " ".into(), "b".into()]);
        assert_eq!(
            normalize_input(input),
            Ok(EmbeddingInput::Batch(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            normalize_input(EmbeddingInput::Batch(vec!["".into(), "  ".into()])),
            Err(ValidationError::EmptyBatch)
        );
        assert_eq!(
            normalize_input(EmbeddingInput::Batch(Vec::new())),
            Err(ValidationError::EmptyBatch)
        );
    }

    #[test]
    fn test_params_from_json() {
        let params: EmbeddingParams =
            serde_json::from_value(json!({ "input": ["x", "y"], "encoding_format": "base64" }))
                .unwrap();
        assert_eq!(params.model, "Qwen/Qwen3-Embedding-8B");
        assert!(params.input.is_batch());
        assert_eq!(params.encoding_format, EncodingFormat::Base64);
    }
}
