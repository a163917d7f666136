use serde::Serialize;
use serde_json::Value;

pub struct SolveRequest {
    // Provider-specific conversation payload; opaque to the relay.
    pub contents: Option<Value>,
}

impl From<Value> for SolveRequest {
    // Only a JSON object can carry `contents`; arrays and scalars carry nothing.
    fn from(body: Value) -> Self {
        let contents = match body {
            Value::Object(mut fields) => fields.remove("contents"),
            _ => None,
        };
        Self { contents }
    }
}

#[derive(Serialize)]
pub struct SolveResponse {
    // Reply text extracted from the first candidate.
    pub text: String,
}

// Shared HTTP response type for consistent API error payloads.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}
