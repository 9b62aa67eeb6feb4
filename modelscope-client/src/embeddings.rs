//! Embedding endpoint

use crate::InferenceClient;
use crate::error::Result;
use modelscope_core::dto::embedding::{EmbeddingRequest, EmbeddingResponse};

impl InferenceClient {
    /// Embed one text or a batch of texts
    pub async fn create_embedding(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let response = self.post("embeddings").json(request).send().await?;

        self.handle_response(response).await
    }
}
