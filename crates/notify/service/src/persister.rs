//! Windowed bulk persistence with per-record fallback.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use notify_core::{DeviceRecord, IngestError, PushRecord};
use notify_storage::{DeviceStore, NotificationStore};

/// Positionally aligned push records, device records and uids.
///
/// Entries are only ever appended as a pair, so index `i` of each list
/// always refers to the same raw notification.
#[derive(Debug, Clone, Default)]
pub struct PreparedBatch {
    pushes: Vec<PushRecord>,
    devices: Vec<DeviceRecord>,
    uids: Vec<i32>,
}

/// One window of a [`PreparedBatch`].
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub pushes: &'a [PushRecord],
    pub devices: &'a [DeviceRecord],
    pub uids: &'a [i32],
}

impl PreparedBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pushes: Vec::with_capacity(capacity),
            devices: Vec::with_capacity(capacity),
            uids: Vec::with_capacity(capacity),
        }
    }

    /// Append the records prepared from one raw notification.
    pub fn push(&mut self, push: PushRecord, device: DeviceRecord) {
        debug_assert_eq!(push.uid, device.uid);
        self.uids.push(push.uid);
        self.pushes.push(push);
        self.devices.push(device);
    }

    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn pushes(&self) -> &[PushRecord] {
        &self.pushes
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn uids(&self) -> &[i32] {
        &self.uids
    }

    /// Consecutive windows of at most `size` entries; the last may be shorter.
    pub fn windows(&self, size: NonZeroUsize) -> impl Iterator<Item = Window<'_>> {
        let size = size.get();
        self.pushes
            .chunks(size)
            .zip(self.devices.chunks(size))
            .zip(self.uids.chunks(size))
            .map(|((pushes, devices), uids)| Window {
                pushes,
                devices,
                uids,
            })
    }
}

/// Persists records a window at a time.
///
/// A window is saved with one bulk call. If that call errors or saves fewer
/// records than the window holds, every record of the window is saved
/// individually instead. Windows are never retried in bulk.
#[derive(Debug, Clone, Copy)]
pub struct BatchPersister {
    batch_size: NonZeroUsize,
}

impl BatchPersister {
    /// Create a persister from a store's declared batch size preference.
    pub fn from_preference(preferred: i64) -> Result<Self, IngestError> {
        usize::try_from(preferred)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(|batch_size| Self { batch_size })
            .ok_or(IngestError::InvalidBatchSize(preferred))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Persist a prepared batch, notifications then devices for each window.
    ///
    /// Returns the uids whose notification could not be saved.
    pub fn persist<N, D>(
        &self,
        notifications: &N,
        devices: &D,
        batch: &PreparedBatch,
    ) -> BTreeSet<i32>
    where
        N: NotificationStore + ?Sized,
        D: DeviceStore + ?Sized,
    {
        let mut failed = BTreeSet::new();

        for window in batch.windows(self.batch_size) {
            flush_notifications(notifications, window.pushes, window.uids, &mut failed);
            flush_devices(devices, window.devices);
        }

        failed
    }

    /// Persist push records, returning the uids that could not be saved.
    ///
    /// `uids[i]` must be the uid of `records[i]`.
    pub fn persist_notifications<N>(
        &self,
        store: &N,
        records: &[PushRecord],
        uids: &[i32],
    ) -> BTreeSet<i32>
    where
        N: NotificationStore + ?Sized,
    {
        debug_assert_eq!(records.len(), uids.len());
        let size = self.batch_size.get();
        let mut failed = BTreeSet::new();

        for (records, uids) in records.chunks(size).zip(uids.chunks(size)) {
            flush_notifications(store, records, uids, &mut failed);
        }

        failed
    }

    /// Persist device records. Failures are logged and dropped.
    pub fn persist_devices<D>(&self, store: &D, records: &[DeviceRecord])
    where
        D: DeviceStore + ?Sized,
    {
        for window in records.chunks(self.batch_size.get()) {
            flush_devices(store, window);
        }
    }
}

fn flush_notifications<N>(
    store: &N,
    records: &[PushRecord],
    uids: &[i32],
    failed: &mut BTreeSet<i32>,
) where
    N: NotificationStore + ?Sized,
{
    match store.save_many(records) {
        Ok(saved) if saved.len() == records.len() => return,
        Ok(saved) => tracing::error!(
            expected = records.len(),
            actual = saved.len(),
            "notification batch save incomplete"
        ),
        Err(e) => tracing::error!(error = %e, size = records.len(), "notification batch save failed"),
    }

    tracing::info!(size = records.len(), "saving notifications individually");

    for (record, &uid) in records.iter().zip(uids) {
        match store.save_one(record) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::error!(uid, "notification not saved");
                failed.insert(uid);
            }
            Err(e) => {
                tracing::error!(uid, error = %e, "failed to save notification");
                failed.insert(uid);
            }
        }
    }
}

// Device failures never reach the caller's failed uid set.
fn flush_devices<D>(store: &D, records: &[DeviceRecord])
where
    D: DeviceStore + ?Sized,
{
    match store.save_many(records) {
        Ok(saved) if saved.len() == records.len() => return,
        Ok(saved) => tracing::error!(
            expected = records.len(),
            actual = saved.len(),
            "device details batch save incomplete"
        ),
        Err(e) => tracing::error!(error = %e, size = records.len(), "device details batch save failed"),
    }

    tracing::info!(size = records.len(), "saving device details individually");

    for record in records {
        if let Err(e) = store.save_one(record) {
            tracing::error!(uid = record.uid, error = %e, "failed to save device details");
        }
    }
}
