//! Fault-injecting store wrapper for service tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use notify_core::{ContextRecord, DeviceRecord, PushRecord};
use notify_storage::{ContextStore, DeviceStore, MemoryStorage, NotificationStore};

/// Which storage calls should misbehave.
#[derive(Debug, Default, Clone)]
pub struct Faults {
    pub fail_context_lookup: bool,
    /// Every notification bulk save errors.
    pub fail_all_bulk: bool,
    /// Notification bulk saves error when the window holds one of these uids.
    pub fail_bulk_containing: HashSet<i32>,
    /// Notification bulk saves silently drop the last record.
    pub short_bulk: bool,
    /// Individual notification saves return `None` for these uids.
    pub reject_uids: HashSet<i32>,
    /// Individual notification saves error for these uids.
    pub error_uids: HashSet<i32>,
    pub fail_device_bulk: bool,
    /// Device bulk saves silently drop the last record.
    pub short_device_bulk: bool,
    pub fail_device_lookup: bool,
    /// Individual device saves error for these uids.
    pub error_device_uids: HashSet<i32>,
}

/// Counts of storage calls made through a [`FaultyStorage`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub context_lookups: usize,
    /// Window sizes passed to notification bulk saves.
    pub bulk: Vec<usize>,
    /// Uids passed to individual notification saves.
    pub single: Vec<i32>,
    pub device_bulk: Vec<usize>,
    pub device_single: Vec<i32>,
}

#[derive(Clone)]
pub struct FaultyStorage {
    pub inner: MemoryStorage,
    faults: Faults,
    calls: Arc<Mutex<Calls>>,
}

impl FaultyStorage {
    pub fn new(inner: MemoryStorage, faults: Faults) -> Self {
        Self {
            inner,
            faults,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, f: impl FnOnce(&mut Calls)) {
        f(&mut self.calls.lock().unwrap());
    }
}

impl ContextStore for FaultyStorage {
    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Option<ContextRecord>> {
        self.record(|c| c.context_lookups += 1);
        if self.faults.fail_context_lookup {
            color_eyre::eyre::bail!("simulated context lookup failure");
        }
        ContextStore::find_by_context(&self.inner, context_id)
    }

    fn store_context(&self, context_id: &str, token: &str) -> color_eyre::eyre::Result<()> {
        self.inner.store_context(context_id, token)
    }
}

impl NotificationStore for FaultyStorage {
    fn preferred_batch_size(&self) -> i64 {
        self.inner.preferred_batch_size()
    }

    fn save_one(&self, record: &PushRecord) -> color_eyre::eyre::Result<Option<PushRecord>> {
        self.record(|c| c.single.push(record.uid));
        if self.faults.error_uids.contains(&record.uid) {
            color_eyre::eyre::bail!("simulated save failure for {}", record.uid);
        }
        if self.faults.reject_uids.contains(&record.uid) {
            return Ok(None);
        }
        NotificationStore::save_one(&self.inner, record)
    }

    fn save_many(&self, records: &[PushRecord]) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        self.record(|c| c.bulk.push(records.len()));
        let poisoned = records
            .iter()
            .any(|r| self.faults.fail_bulk_containing.contains(&r.uid));
        if self.faults.fail_all_bulk || poisoned {
            color_eyre::eyre::bail!("simulated batch failure");
        }
        if self.faults.short_bulk {
            let kept = &records[..records.len().saturating_sub(1)];
            return NotificationStore::save_many(&self.inner, kept);
        }
        NotificationStore::save_many(&self.inner, records)
    }

    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        NotificationStore::find_by_context(&self.inner, context_id)
    }
}

impl DeviceStore for FaultyStorage {
    fn find_by_uid_and_context(
        &self,
        uid: i32,
        context_id: &str,
    ) -> color_eyre::eyre::Result<Option<DeviceRecord>> {
        if self.faults.fail_device_lookup {
            color_eyre::eyre::bail!("simulated device lookup failure");
        }
        self.inner.find_by_uid_and_context(uid, context_id)
    }

    fn save_one(&self, record: &DeviceRecord) -> color_eyre::eyre::Result<DeviceRecord> {
        self.record(|c| c.device_single.push(record.uid));
        if self.faults.error_device_uids.contains(&record.uid) {
            color_eyre::eyre::bail!("simulated device save failure for {}", record.uid);
        }
        DeviceStore::save_one(&self.inner, record)
    }

    fn save_many(&self, records: &[DeviceRecord]) -> color_eyre::eyre::Result<Vec<DeviceRecord>> {
        self.record(|c| c.device_bulk.push(records.len()));
        if self.faults.fail_device_bulk {
            color_eyre::eyre::bail!("simulated device batch failure");
        }
        if self.faults.short_device_bulk {
            let kept = &records[..records.len().saturating_sub(1)];
            return DeviceStore::save_many(&self.inner, kept);
        }
        DeviceStore::save_many(&self.inner, records)
    }
}

/// Persisted notification uids for a context, in storage order.
pub fn stored_uids(storage: &MemoryStorage, context_id: &str) -> Vec<i32> {
    NotificationStore::find_by_context(storage, context_id)
        .unwrap()
        .iter()
        .map(|r| r.uid)
        .collect()
}
