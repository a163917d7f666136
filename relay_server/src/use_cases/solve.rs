use serde_json::Value;

use crate::domain::{GenerateContentRequest, GenerationProvider, ProviderError, SystemInstruction};

// Location of the reply text inside a generateContent response.
const REPLY_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

// Domain-level errors for the solve workflow.
#[derive(Debug)]
pub enum SolveError {
    MissingContents,
    // The upstream call failed outright (transport or non-2xx status).
    UpstreamFailure(ProviderError),
    // The upstream call succeeded but carried no usable text, e.g. a safety block.
    EmptyResponse { raw: Value },
}

// Reply text produced by the solve use case.
#[derive(Debug)]
pub struct Solution {
    pub text: String,
}

// Solve use case with injected dependencies.
pub struct SolveUseCase<P> {
    pub provider: P,
    pub system_instruction: Option<SystemInstruction>,
}

impl<P> SolveUseCase<P>
where
    P: GenerationProvider,
{
    pub async fn execute(&self, contents: Option<Value>) -> Result<Solution, SolveError> {
        let contents = match contents {
            Some(value) if !is_blank(&value) => value,
            _ => return Err(SolveError::MissingContents),
        };

        let req = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.clone(),
        };

        let raw = self
            .provider
            .generate_content(req)
            .await
            .map_err(SolveError::UpstreamFailure)?;

        match extract_text(&raw) {
            Some(text) => Ok(Solution {
                text: text.to_string(),
            }),
            None => Err(SolveError::EmptyResponse { raw }),
        }
    }
}

// Pulls the first candidate's first text part; empty strings count as no text.
pub fn extract_text(raw: &Value) -> Option<&str> {
    raw.pointer(REPLY_TEXT_POINTER)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

// Clients historically sent falsy placeholders (null, "", 0, false) for an
// absent payload, so those are rejected the same way as a missing key.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    enum Outcome {
        Reply(Value),
        Fail(&'static str),
    }

    #[derive(Clone)]
    struct RecordingProvider {
        // Shared log lets tests inspect what execute() forwarded.
        calls: Arc<Mutex<Vec<GenerateContentRequest>>>,
        outcome: Outcome,
    }

    impl RecordingProvider {
        fn new(outcome: Outcome) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                outcome,
            }
        }

        fn calls(&self) -> Vec<GenerateContentRequest> {
            self.calls.lock().expect("calls mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl GenerationProvider for RecordingProvider {
        async fn generate_content(
            &self,
            req: GenerateContentRequest,
        ) -> Result<Value, ProviderError> {
            self.calls.lock().expect("calls mutex poisoned").push(req);
            match &self.outcome {
                Outcome::Reply(value) => Ok(value.clone()),
                Outcome::Fail(message) => Err((*message).into()),
            }
        }
    }

    fn reply_with_text(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    fn user_contents() -> Value {
        json!([{ "role": "user", "parts": [{ "text": "Integrate x^2 dx" }] }])
    }

    #[tokio::test]
    async fn when_upstream_returns_text_then_text_is_returned() {
        let provider = RecordingProvider::new(Outcome::Reply(reply_with_text("x^3/3 + C")));
        let use_case = SolveUseCase {
            provider: provider.clone(),
            system_instruction: None,
        };

        let result = use_case
            .execute(Some(user_contents()))
            .await
            .expect("expected solve to succeed");

        assert_eq!(result.text, "x^3/3 + C");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].contents, user_contents());
        assert!(calls[0].system_instruction.is_none());
    }

    #[tokio::test]
    async fn when_contents_is_missing_then_upstream_is_not_called() {
        let provider = RecordingProvider::new(Outcome::Reply(reply_with_text("unused")));
        let use_case = SolveUseCase {
            provider: provider.clone(),
            system_instruction: None,
        };

        let result = use_case.execute(None).await;

        assert!(matches!(result, Err(SolveError::MissingContents)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn when_contents_is_a_falsy_placeholder_then_returns_missing_contents() {
        for placeholder in [json!(null), json!(""), json!(0), json!(false)] {
            let provider = RecordingProvider::new(Outcome::Reply(reply_with_text("unused")));
            let use_case = SolveUseCase {
                provider: provider.clone(),
                system_instruction: None,
            };

            let result = use_case.execute(Some(placeholder.clone())).await;

            assert!(
                matches!(result, Err(SolveError::MissingContents)),
                "expected {placeholder} to be rejected"
            );
            assert!(provider.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn when_contents_is_an_empty_array_then_it_is_forwarded() {
        let provider = RecordingProvider::new(Outcome::Reply(reply_with_text("ok")));
        let use_case = SolveUseCase {
            provider: provider.clone(),
            system_instruction: None,
        };

        let result = use_case.execute(Some(json!([]))).await;

        assert!(result.is_ok());
        assert_eq!(provider.calls()[0].contents, json!([]));
    }

    #[tokio::test]
    async fn when_system_instruction_is_configured_then_it_is_forwarded() {
        let provider = RecordingProvider::new(Outcome::Reply(reply_with_text("ok")));
        let use_case = SolveUseCase {
            provider: provider.clone(),
            system_instruction: Some(SystemInstruction::new("Use LaTeX.")),
        };

        use_case
            .execute(Some(user_contents()))
            .await
            .expect("expected solve to succeed");

        assert_eq!(
            provider.calls()[0].system_instruction,
            Some(SystemInstruction::new("Use LaTeX."))
        );
    }

    #[tokio::test]
    async fn when_upstream_fails_then_returns_upstream_failure() {
        let use_case = SolveUseCase {
            provider: RecordingProvider::new(Outcome::Fail("connection refused")),
            system_instruction: None,
        };

        let result = use_case.execute(Some(user_contents())).await;

        match result {
            Err(SolveError::UpstreamFailure(err)) => {
                assert_eq!(err.to_string(), "connection refused");
            }
            other => panic!("expected upstream failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_reply_is_safety_blocked_then_returns_empty_response_with_raw_payload() {
        let blocked = json!({
            "candidates": [{ "finishReason": "SAFETY", "safetyRatings": [] }]
        });
        let use_case = SolveUseCase {
            provider: RecordingProvider::new(Outcome::Reply(blocked.clone())),
            system_instruction: None,
        };

        let result = use_case.execute(Some(user_contents())).await;

        match result {
            Err(SolveError::EmptyResponse { raw }) => assert_eq!(raw, blocked),
            other => panic!("expected empty response, got {other:?}"),
        }
    }

    #[test]
    fn extract_text_reads_first_candidate_first_part() {
        let raw = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second" }] } },
                { "content": { "parts": [{ "text": "other" }] } }
            ]
        });

        assert_eq!(extract_text(&raw), Some("first"));
    }

    #[test]
    fn extract_text_rejects_missing_empty_and_non_string_text() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": { "parts": [] } }] })),
            None
        );
        assert_eq!(extract_text(&reply_with_text("")), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] })),
            None
        );
        assert_eq!(extract_text(&json!("not an object")), None);
    }
}
