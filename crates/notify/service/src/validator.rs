//! Request validation.

use notify_core::{ContextRecord, IngestionRequest, ReasonCode, is_blank};
use notify_storage::ContextStore;

/// Outcome of validating a request against the context store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Request may be ingested; carries the matched context.
    Valid(ContextRecord),
    Rejected(ReasonCode),
}

/// Check a request, first failure wins.
///
/// Reads the context store at most once. A lookup error counts as no
/// matching context.
pub fn validate<C>(store: &C, request: &IngestionRequest) -> ValidationOutcome
where
    C: ContextStore + ?Sized,
{
    if is_blank(&request.auth_token) {
        return ValidationOutcome::Rejected(ReasonCode::NoCommAuthToken);
    }

    if is_blank(&request.context_id) {
        return ValidationOutcome::Rejected(ReasonCode::InvalidRequest);
    }

    let context = match store.find_by_context(&request.context_id) {
        Ok(Some(context)) => context,
        Ok(None) => return ValidationOutcome::Rejected(ReasonCode::NoContextAvailable),
        Err(e) => {
            tracing::warn!(
                context_id = %request.context_id,
                error = %e,
                "context lookup failed"
            );
            return ValidationOutcome::Rejected(ReasonCode::NoContextAvailable);
        }
    };

    if context.token != request.auth_token {
        return ValidationOutcome::Rejected(ReasonCode::InvalidCommAuthToken);
    }

    if request.records.is_empty() {
        return ValidationOutcome::Rejected(ReasonCode::NoDataAvailable);
    }

    ValidationOutcome::Valid(context)
}
