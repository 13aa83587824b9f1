//! Ingestion orchestration.

use std::collections::BTreeSet;

use color_eyre::eyre::WrapErr as _;
use notify_core::{IngestionRequest, IngestionResult};
use notify_storage::{AllStorage, ContextStore, DeviceStore, NotificationStore};

use crate::{BatchPersister, Ingest, PreparedBatch, ValidationOutcome};

/// Core ingestion service.
///
/// Holds one handle per store; no state is kept between calls.
#[derive(Clone)]
pub struct Ingestor<C, N, D> {
    contexts: C,
    notifications: N,
    devices: D,
}

impl<C, N, D> Ingestor<C, N, D> {
    /// Create a new ingestor from its three stores.
    pub fn new(contexts: C, notifications: N, devices: D) -> Self {
        Self {
            contexts,
            notifications,
            devices,
        }
    }
}

impl<S: AllStorage + Clone> Ingestor<S, S, S> {
    /// Create an ingestor backed by a single storage for all three stores.
    pub fn from_storage(storage: S) -> Self {
        Self::new(storage.clone(), storage.clone(), storage)
    }
}

impl<C, N, D> Ingestor<C, N, D>
where
    C: ContextStore,
    N: NotificationStore,
    D: DeviceStore,
{
    /// Run one ingestion call to completion on the current thread.
    pub fn ingest_sync(
        &self,
        request: &IngestionRequest,
    ) -> color_eyre::eyre::Result<IngestionResult> {
        let span = tracing::info_span!(
            "ingest",
            ingestion_id = %uuid::Uuid::new_v4(),
            context_id = %request.context_id
        );
        let _entered = span.enter();

        let context = match crate::validate(&self.contexts, request) {
            ValidationOutcome::Valid(context) => context,
            ValidationOutcome::Rejected(reason) => {
                tracing::info!(%reason, "request rejected");
                return Ok(IngestionResult::Rejected(reason));
            }
        };

        let persister = BatchPersister::from_preference(self.notifications.preferred_batch_size())
            .wrap_err("invalid notification store configuration")?;

        let batch = self.prepare(&context.context_id, request)?;

        tracing::info!(
            records = batch.len(),
            batch_size = persister.batch_size(),
            "persisting notifications"
        );

        let failed_uids: BTreeSet<i32> = persister.persist(&self.notifications, &self.devices, &batch);

        if failed_uids.is_empty() {
            tracing::info!(records = batch.len(), "ingestion complete");
        } else {
            tracing::warn!(
                records = batch.len(),
                failed = failed_uids.len(),
                ?failed_uids,
                "ingestion completed with failures"
            );
        }

        Ok(IngestionResult::Success { failed_uids })
    }

    /// Transform every entry before anything is persisted.
    fn prepare(
        &self,
        context_id: &str,
        request: &IngestionRequest,
    ) -> color_eyre::eyre::Result<PreparedBatch> {
        let mut batch = PreparedBatch::with_capacity(request.records.len());

        for (index, raw) in request.records.iter().enumerate() {
            let push = crate::to_push_record(context_id, raw, request)
                .wrap_err_with(|| format!("invalid notification at index {index}"))?;
            let device = crate::to_device_record(&self.devices, context_id, raw)
                .wrap_err_with(|| format!("invalid notification at index {index}"))?;
            tracing::debug!(uid = push.uid, created_at = %push.created_at_text(), "prepared notification");
            batch.push(push, device);
        }

        Ok(batch)
    }
}

impl<C, N, D> Ingest for Ingestor<C, N, D>
where
    C: ContextStore,
    N: NotificationStore,
    D: DeviceStore,
{
    async fn ingest(
        &self,
        request: &IngestionRequest,
    ) -> color_eyre::eyre::Result<IngestionResult> {
        self.ingest_sync(request)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use notify_core::{IngestError, RawNotification, ReasonCode};
    use notify_storage::MemoryStorage;

    use super::*;
    use crate::testing::{Faults, FaultyStorage, stored_uids};

    const CONTEXT: &str = "DEMO_CLINIC";
    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.demo";

    fn storage(batch_size: i64, faults: Faults) -> FaultyStorage {
        let inner = MemoryStorage::new().with_batch_size(batch_size);
        inner.store_context(CONTEXT, TOKEN).unwrap();
        FaultyStorage::new(inner, faults)
    }

    fn entry(uid: i32, token: &str) -> RawNotification {
        RawNotification {
            uid: uid.to_string(),
            message_count: "1".into(),
            message_type: "REMINDER".into(),
            device_platform: "Android".into(),
            device_token: token.into(),
            message: "msg".into(),
        }
    }

    fn request(uids: &[i32]) -> IngestionRequest {
        uids.iter().fold(
            IngestionRequest::new(TOKEN, CONTEXT).with_source(
                "192.168.1.100",
                "clinic-server-prod-01",
                "/usr/local/tomcat9",
            ),
            |req, &uid| req.with_record(entry(uid, "token")),
        )
    }

    fn failed(result: IngestionResult) -> BTreeSet<i32> {
        match result {
            IngestionResult::Success { failed_uids } => failed_uids,
            IngestionResult::Rejected(reason) => panic!("rejected: {reason}"),
        }
    }

    #[tokio::test]
    async fn test_all_saved_once() {
        let store = storage(2, Faults::default());
        let ingestor = Ingestor::from_storage(store.clone());

        let result = ingestor.ingest(&request(&[1512, 1513, 1514])).await.unwrap();

        assert!(failed(result).is_empty());
        assert_eq!(stored_uids(&store.inner, CONTEXT), vec![1512, 1513, 1514]);
        assert_eq!(store.inner.device_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_rejection_persists_nothing() {
        let store = storage(2, Faults::default());
        let ingestor = Ingestor::from_storage(store.clone());

        let mut req = request(&[1]);
        req.auth_token = String::new();
        let result = ingestor.ingest(&req).await.unwrap();

        assert_eq!(result, IngestionResult::Rejected(ReasonCode::NoCommAuthToken));
        assert!(store.calls().bulk.is_empty());
        assert!(stored_uids(&store.inner, CONTEXT).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_token_is_stable() {
        let store = storage(2, Faults::default());
        let ingestor = Ingestor::from_storage(store);

        let mut req = request(&[1]);
        req.auth_token = "wrong".into();

        let first = ingestor.ingest(&req).await.unwrap();
        let second = ingestor.ingest(&req).await.unwrap();
        assert_eq!(first, IngestionResult::Rejected(ReasonCode::InvalidCommAuthToken));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bulk_failure_fully_recovered() {
        let faults = Faults {
            fail_all_bulk: true,
            ..Default::default()
        };
        let store = storage(3, faults);
        let ingestor = Ingestor::from_storage(store.clone());

        let result = ingestor.ingest(&request(&[1, 2, 3, 4])).await.unwrap();

        assert!(failed(result).is_empty());
        assert_eq!(store.calls().bulk, vec![3, 1]);
        assert_eq!(stored_uids(&store.inner, CONTEXT), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_single_rejected_uid_reported() {
        let faults = Faults {
            fail_all_bulk: true,
            reject_uids: HashSet::from([8888]),
            ..Default::default()
        };
        let store = storage(3, faults);
        let ingestor = Ingestor::from_storage(store.clone());

        let result = ingestor.ingest(&request(&[8888, 8889, 8890])).await.unwrap();

        assert_eq!(failed(result), BTreeSet::from([8888]));
        assert_eq!(stored_uids(&store.inner, CONTEXT), vec![8889, 8890]);
    }

    #[tokio::test]
    async fn test_trailing_window_fallback() {
        let faults = Faults {
            fail_bulk_containing: HashSet::from([3]),
            ..Default::default()
        };
        let store = storage(2, faults);
        let ingestor = Ingestor::from_storage(store.clone());

        let result = ingestor.ingest(&request(&[1, 2, 3])).await.unwrap();

        assert!(failed(result).is_empty());
        assert_eq!(store.calls().single, vec![3]);
    }

    #[tokio::test]
    async fn test_failed_never_exceeds_records() {
        let faults = Faults {
            fail_all_bulk: true,
            reject_uids: HashSet::from([1, 2, 3]),
            ..Default::default()
        };
        let store = storage(2, faults);
        let ingestor = Ingestor::from_storage(store);

        let req = request(&[1, 2, 3]);
        let failed = failed(ingestor.ingest(&req).await.unwrap());
        assert!(failed.len() <= req.records.len());
        assert_eq!(failed, BTreeSet::from([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_device_token_updated_not_duplicated() {
        let store = storage(5, Faults::default());
        let ingestor = Ingestor::from_storage(store.clone());

        let first = IngestionRequest::new(TOKEN, CONTEXT).with_record(entry(42, "first"));
        let second = IngestionRequest::new(TOKEN, CONTEXT).with_record(entry(42, "second"));
        ingestor.ingest(&first).await.unwrap();
        ingestor.ingest(&second).await.unwrap();

        assert_eq!(store.inner.device_count().unwrap(), 1);
        let device = store
            .inner
            .find_by_uid_and_context(42, CONTEXT)
            .unwrap()
            .unwrap();
        assert_eq!(device.device_token, "second");
    }

    #[tokio::test]
    async fn test_malformed_uid_aborts_before_persisting() {
        let store = storage(1, Faults::default());
        let ingestor = Ingestor::from_storage(store.clone());

        let mut req = request(&[1, 2]);
        req.records.push(RawNotification {
            uid: "not-a-number".into(),
            message_count: "1".into(),
            ..Default::default()
        });

        let err = ingestor.ingest(&req).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::MalformedNumber { field: "uid", .. })
        ));
        assert!(store.calls().bulk.is_empty());
        assert!(stored_uids(&store.inner, CONTEXT).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_batch_size_is_config_error() {
        for size in [0, -1] {
            let store = storage(size, Faults::default());
            let ingestor = Ingestor::from_storage(store);

            let err = ingestor.ingest(&request(&[1])).await.unwrap_err();
            assert_eq!(
                err.downcast_ref::<IngestError>(),
                Some(&IngestError::InvalidBatchSize(size))
            );
        }
    }

    #[tokio::test]
    async fn test_separate_stores() {
        let contexts = MemoryStorage::new();
        contexts.store_context(CONTEXT, TOKEN).unwrap();
        let notifications = MemoryStorage::new().with_batch_size(2);
        let devices = MemoryStorage::new();
        let ingestor = Ingestor::new(contexts, notifications.clone(), devices.clone());

        let result = ingestor.ingest(&request(&[5, 6, 7])).await.unwrap();

        assert!(failed(result).is_empty());
        assert_eq!(stored_uids(&notifications, CONTEXT), vec![5, 6, 7]);
        assert_eq!(devices.device_count().unwrap(), 3);
    }
}
