//! Chat completion endpoint

use crate::InferenceClient;
use crate::error::Result;
use modelscope_core::dto::chat::{ChatCompletion, ChatCompletionRequest};

impl InferenceClient {
    /// Create a chat completion
    ///
    /// Works for both text and vision models; vision requests carry
    /// multi-part messages with an `image_url` part.
    pub async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<ChatCompletion> {
        let response = self.post("chat/completions").json(request).send().await?;

        self.handle_response(response).await
    }
}
