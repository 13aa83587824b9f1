//! Response assembly.

use notify_core::{IngestionResult, NotificationResponse, ResultCode, Status};

/// Map an ingestion result to the response reported to callers.
///
/// Partial failure is still a `Success` status; the failed uids are data.
pub fn build_response(result: &IngestionResult) -> NotificationResponse {
    match result {
        IngestionResult::Success { failed_uids } => NotificationResponse {
            status: Status::Success,
            failed_uids: failed_uids.iter().copied().collect(),
            error_message: None,
        },
        IngestionResult::Rejected(reason) => NotificationResponse {
            status: Status::Failed,
            failed_uids: Vec::new(),
            error_message: Some(reason.as_str().to_string()),
        },
    }
}

/// Envelope result code for a completed or aborted invocation.
pub fn result_code<T>(outcome: &color_eyre::eyre::Result<T>) -> ResultCode {
    match outcome {
        Ok(_) => ResultCode::Success,
        Err(_) => ResultCode::SavePushNotificationDataError,
    }
}

/// Messages of an aborted invocation's error chain, outermost first.
pub fn error_messages(error: &color_eyre::eyre::Report) -> Vec<String> {
    error.chain().map(ToString::to_string).collect()
}
