use async_trait::async_trait;

use crate::error::GenerateError;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Model identifier reported by the health check.
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
