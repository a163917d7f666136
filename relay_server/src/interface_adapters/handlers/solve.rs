use crate::interface_adapters::protocol::{ErrorResponse, SolveRequest, SolveResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{SolveError, SolveUseCase};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

pub const MISSING_CONTENTS: &str = "Missing \"contents\" in request body.";
pub const INVALID_JSON: &str = "Invalid JSON in request body.";
pub const BODY_TOO_LARGE: &str = "Request body too large.";
pub const EMPTY_RESPONSE: &str = "Received an empty or invalid response from the AI service.";
pub const UPSTREAM_FAILURE: &str = "Failed to fetch response from the AI service.";

type ErrorReply = (StatusCode, Json<ErrorResponse>);

#[tracing::instrument(name = "solve", skip_all)]
pub async fn solve(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SolveResponse>, ErrorReply> {
    let Json(body) = payload.map_err(map_rejection)?;
    let body = SolveRequest::from(body);

    let use_case = SolveUseCase {
        provider: state.provider.clone(),
        system_instruction: state.system_instruction.clone(),
    };

    let solution = use_case
        .execute(body.contents)
        .await
        .map_err(map_solve_error)?;

    tracing::info!(text_len = solution.text.len(), "solution relayed.");

    Ok(Json(SolveResponse {
        text: solution.text,
    }))
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

// A body not declared as JSON carries no `contents`; only unparseable JSON and
// the size cap get their own messages. Non-object JSON is handled by SolveRequest.
fn map_rejection(rejection: JsonRejection) -> ErrorReply {
    match rejection {
        JsonRejection::MissingJsonContentType(_) | JsonRejection::JsonDataError(_) => {
            error_response(StatusCode::BAD_REQUEST, MISSING_CONTENTS)
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("request body exceeded the size limit.");
            error_response(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE)
        }
        other => {
            tracing::debug!(error = %other, "rejected request body.");
            error_response(StatusCode::BAD_REQUEST, INVALID_JSON)
        }
    }
}

fn map_solve_error(err: SolveError) -> ErrorReply {
    match err {
        SolveError::MissingContents => error_response(StatusCode::BAD_REQUEST, MISSING_CONTENTS),
        SolveError::UpstreamFailure(e) => {
            tracing::error!(error = %e, "error calling gemini api.");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE)
        }
        SolveError::EmptyResponse { raw } => {
            tracing::warn!(%raw, "gemini response was valid but contained no text.");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, EMPTY_RESPONSE)
        }
    }
}
