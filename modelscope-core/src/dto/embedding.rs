//! Embedding DTOs

use serde::{Deserialize, Serialize};

use crate::domain::embedding::{EmbeddingInput, EncodingFormat};

/// Body of `POST /embeddings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: EmbeddingInput,
    pub encoding_format: EncodingFormat,
}

/// Vector payload, shaped by the requested encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingVector {
    Float(Vec<f32>),
    Base64(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingData {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub object: String,
    pub embedding: EmbeddingVector,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Response of `POST /embeddings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub object: String,
    pub model: String,
    pub data: Vec<EmbeddingData>,
    #[serde(default)]
    pub usage: Option<EmbeddingUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = EmbeddingRequest {
            model: "Qwen/Qwen3-Embedding-8B".to_string(),
            input: EmbeddingInput::batch(["a", "b"]),
            encoding_format: EncodingFormat::Float,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "Qwen/Qwen3-Embedding-8B",
                "input": ["a", "b"],
                "encoding_format": "float"
            })
        );
    }

    #[test]
    fn test_response_parsing_both_encodings() {
        let response: EmbeddingResponse = serde_json::from_value(json!({
            "object": "list",
            "model": "Qwen/Qwen3-Embedding-8B",
            "data": [
                { "index": 0, "object": "embedding", "embedding": [0.25, -0.5] },
                { "index": 1, "object": "embedding", "embedding": "AACAPg==" }
            ],
            "usage": { "prompt_tokens": 3, "total_tokens": 3 }
        }))
        .unwrap();

        assert_eq!(response.data[0].embedding, EmbeddingVector::Float(vec![0.25, -0.5]));
        assert_eq!(
            response.data[1].embedding,
            EmbeddingVector::Base64("AACAPg==".to_string())
        );
    }
}
