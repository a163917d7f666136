use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

// The serialization within this layer is a dependency leak, but its a pragmatic approach
// Payload forwarded to the generative-language service.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    // Caller-supplied conversation, passed through untouched.
    pub contents: Value,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInstruction {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

impl SystemInstruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

// The use case depends on this trait, not the concrete client implementation.
// Implementations return the raw upstream document on a 2xx reply.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate_content(&self, req: GenerateContentRequest) -> Result<Value, ProviderError>;
}

#[async_trait]
impl<T> GenerationProvider for Arc<T>
where
    T: GenerationProvider + ?Sized,
{
    async fn generate_content(&self, req: GenerateContentRequest) -> Result<Value, ProviderError> {
        (**self).generate_content(req).await
    }
}
