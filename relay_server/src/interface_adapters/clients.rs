use crate::domain::{GenerateContentRequest, GenerationProvider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

// The clients defined here are for reqwest clients to communicate with external services.
// Thin wrapper around reqwest for the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    // Full endpoint including the `key` query parameter; never log it.
    endpoint: Url,
}

#[derive(Debug, Error)]
pub enum GeminiClientError {
    #[error("invalid gemini base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("gemini http client setup failed: {0}")]
    Build(reqwest::Error),
    #[error("gemini transport error: {0}")]
    Transport(reqwest::Error),
    #[error("gemini upstream error {status}: {body}")]
    Upstream { status: StatusCode, body: String },
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, GeminiClientError> {
        let endpoint = generate_content_url(base_url, model, api_key)?;
        let http = Client::builder().build().map_err(GeminiClientError::Build)?;
        Ok(Self { http, endpoint })
    }
}

fn generate_content_url(
    base_url: &str,
    model: &str,
    api_key: &str,
) -> Result<Url, url::ParseError> {
    // `Url::join` replaces the last path segment unless the base ends with '/'.
    let base = format!("{}/", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&base)?.join(&format!("v1beta/models/{model}:generateContent"))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

// reqwest errors embed the request URL, which carries the credential.
fn transport(err: reqwest::Error) -> GeminiClientError {
    GeminiClientError::Transport(err.without_url())
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate_content(&self, req: GenerateContentRequest) -> Result<Value, ProviderError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();

        // Keep upstream status/body for the server log; callers only see a generic error.
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e.without_url()));
            return Err(Box::new(GeminiClientError::Upstream { status, body }));
        }

        let bytes = res.bytes().await.map_err(transport)?;
        // A 2xx body that is not JSON is kept verbatim so it shows up in the
        // empty-response log instead of being reported as a transport failure.
        Ok(serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
    }
}
