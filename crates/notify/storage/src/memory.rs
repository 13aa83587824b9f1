//! In-memory storage implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use notify_core::{ContextRecord, DeviceRecord, PushRecord};

use crate::traits::*;

#[derive(Debug, Default)]
struct Tables {
    contexts: HashMap<String, String>,
    notifications: Vec<PushRecord>,
    devices: BTreeMap<(String, i32), DeviceRecord>,
}

/// Mutex-guarded storage for tests and local runs.
///
/// Clones share the same tables.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    tables: Arc<Mutex<Tables>>,
    batch_size: i64,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self {
            tables: Arc::default(),
            batch_size: crate::DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the declared batch size preference.
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Number of device registrations across all contexts.
    pub fn device_count(&self) -> color_eyre::eyre::Result<usize> {
        Ok(self.lock()?.devices.len())
    }

    fn lock(&self) -> color_eyre::eyre::Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("memory storage lock poisoned"))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore for MemoryStorage {
    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Option<ContextRecord>> {
        Ok(self
            .lock()?
            .contexts
            .get(context_id)
            .map(|token| ContextRecord {
                context_id: context_id.to_string(),
                token: token.clone(),
            }))
    }

    fn store_context(&self, context_id: &str, token: &str) -> color_eyre::eyre::Result<()> {
        self.lock()?
            .contexts
            .insert(context_id.to_string(), token.to_string());
        Ok(())
    }
}

impl NotificationStore for MemoryStorage {
    fn preferred_batch_size(&self) -> i64 {
        self.batch_size
    }

    fn save_one(&self, record: &PushRecord) -> color_eyre::eyre::Result<Option<PushRecord>> {
        self.lock()?.notifications.push(record.clone());
        Ok(Some(record.clone()))
    }

    fn save_many(&self, records: &[PushRecord]) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        self.lock()?.notifications.extend_from_slice(records);
        Ok(records.to_vec())
    }

    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Vec<PushRecord>> {
        Ok(self
            .lock()?
            .notifications
            .iter()
            .filter(|r| r.context_id == context_id)
            .cloned()
            .collect())
    }
}

impl DeviceStore for MemoryStorage {
    fn find_by_uid_and_context(
        &self,
        uid: i32,
        context_id: &str,
    ) -> color_eyre::eyre::Result<Option<DeviceRecord>> {
        Ok(self
            .lock()?
            .devices
            .get(&(context_id.to_string(), uid))
            .cloned())
    }

    fn save_one(&self, record: &DeviceRecord) -> color_eyre::eyre::Result<DeviceRecord> {
        self.lock()?
            .devices
            .insert((record.context_id.clone(), record.uid), record.clone());
        Ok(record.clone())
    }

    fn save_many(&self, records: &[DeviceRecord]) -> color_eyre::eyre::Result<Vec<DeviceRecord>> {
        let mut tables = self.lock()?;
        for record in records {
            tables
                .devices
                .insert((record.context_id.clone(), record.uid), record.clone());
        }
        Ok(records.to_vec())
    }
}
