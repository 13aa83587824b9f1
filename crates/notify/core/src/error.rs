//! Conditions that abort an ingestion call.

/// Fatal ingestion errors.
///
/// Carried inside an `eyre::Report`; use `downcast_ref` to inspect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("malformed numeric {field}: {value:?}")]
    MalformedNumber { field: &'static str, value: String },
    #[error("invalid batch size {0}, expected a positive value that fits in usize")]
    InvalidBatchSize(i64),
}
