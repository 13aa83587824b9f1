//! Ingestion outcomes and response types.

use std::collections::BTreeSet;

/// Why a request was rejected before any record was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReasonCode {
    /// Auth token missing or blank.
    NoCommAuthToken,
    /// Context id missing or blank.
    InvalidRequest,
    /// No stored context matches the request.
    NoContextAvailable,
    /// Supplied token does not match the stored one.
    InvalidCommAuthToken,
    /// Request carried no records.
    NoDataAvailable,
}

impl ReasonCode {
    /// Textual reason code reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCommAuthToken => "NoCommAuthToken",
            Self::InvalidRequest => "InvalidRequest",
            Self::NoContextAvailable => "NoContextAvailable",
            Self::InvalidCommAuthToken => "InvalidCommAuthToken",
            Self::NoDataAvailable => "NoDataAvailable",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionResult {
    /// Request was processed. An empty set means every record persisted.
    Success { failed_uids: BTreeSet<i32> },
    /// Request failed validation.
    Rejected(ReasonCode),
}

impl IngestionResult {
    /// Failed uids for a processed request, `None` for a rejection.
    pub fn failed_uids(&self) -> Option<&BTreeSet<i32>> {
        match self {
            Self::Success { failed_uids } => Some(failed_uids),
            Self::Rejected(_) => None,
        }
    }

    /// Rejection reason, if any.
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Self::Success { .. } => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Outcome status reported in a [`NotificationResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Success,
    Failed,
}

/// Response assembled for the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationResponse {
    pub status: Status,
    /// Uids that could not be persisted. Empty on full success and on rejection.
    pub failed_uids: Vec<i32>,
    /// Reason code text for a rejection.
    pub error_message: Option<String>,
}

/// Envelope-level result of a service invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResultCode {
    /// The invocation completed; see the payload status for the outcome.
    Success,
    /// The invocation aborted on an unrecoverable error.
    SavePushNotificationDataError,
}

impl ResultCode {
    /// Human-readable message for the code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::SavePushNotificationDataError => "Error while saving push notification data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_code_text() {
        assert_eq!(ReasonCode::NoCommAuthToken.to_string(), "NoCommAuthToken");
        assert_eq!(
            ReasonCode::InvalidCommAuthToken.as_str(),
            "InvalidCommAuthToken"
        );
    }

    #[test]
    fn test_result_accessors() {
        let rejected = IngestionResult::Rejected(ReasonCode::NoDataAvailable);
        assert_eq!(rejected.reason(), Some(ReasonCode::NoDataAvailable));
        assert!(rejected.failed_uids().is_none());

        let ok = IngestionResult::Success {
            failed_uids: BTreeSet::from([4]),
        };
        assert_eq!(ok.reason(), None);
        assert_eq!(ok.failed_uids().unwrap().len(), 1);
    }
}
