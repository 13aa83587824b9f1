//! Notification HTTP handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use notify_core::{IngestionRequest, IngestionResult};
use notify_service::{Ingest, build_response, error_messages, result_code};

use crate::dto::{NotificationRequestDto, ServiceResponse};

/// Handle push notification submissions.
pub async fn ingest_handler<S>(
    State(service): State<S>,
    Json(body): Json<NotificationRequestDto>,
) -> impl IntoResponse
where
    S: Ingest,
{
    let request = IngestionRequest::from(body);
    let outcome = service.ingest(&request).await;

    match &outcome {
        Ok(result) => tracing::debug!(
            context_id = %request.context_id,
            reason = ?result.reason(),
            failed = result.failed_uids().map_or(0, |uids| uids.len()),
            "push notification data handled"
        ),
        Err(e) => tracing::error!(
            error = ?e,
            context_id = %request.context_id,
            "failed to save push notification data"
        ),
    }

    let (status, response) = envelope(&outcome);
    (status, Json(response))
}

fn envelope(outcome: &color_eyre::eyre::Result<IngestionResult>) -> (StatusCode, ServiceResponse) {
    let code = result_code(outcome);

    match outcome {
        Ok(result) => (
            StatusCode::OK,
            ServiceResponse {
                result_code: code,
                message: code.message().to_string(),
                data: Some(build_response(result).into()),
                errors: Vec::new(),
            },
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ServiceResponse {
                result_code: code,
                message: code.message().to_string(),
                data: None,
                errors: error_messages(e),
            },
        ),
    }
}
