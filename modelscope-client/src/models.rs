//! Model listing endpoint

use crate::InferenceClient;
use crate::error::Result;
use modelscope_core::dto::model::ModelList;

impl InferenceClient {
    /// List the models visible to the access token
    pub async fn list_models(&self) -> Result<ModelList> {
        let response = self.get("models").send().await?;

        self.handle_response(response).await
    }

    /// Check that the access token is accepted
    ///
    /// # Returns
    /// The number of models visible to the token
    pub async fn verify_credentials(&self) -> Result<usize> {
        let models = self.list_models().await?;
        Ok(models.data.len())
    }
}
