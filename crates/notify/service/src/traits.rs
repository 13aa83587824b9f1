//! Service traits.

use notify_core::{IngestionRequest, IngestionResult};

/// Notification ingestion service trait.
#[trait_variant::make(Send)]
pub trait Ingest: Send + Sync {
    /// Validate and persist a batch of notifications.
    ///
    /// Errors only on malformed numeric input or an invalid batch size
    /// preference. Storage failures are reported through the result.
    async fn ingest(
        &self,
        request: &IngestionRequest,
    ) -> color_eyre::eyre::Result<IngestionResult>;
}
