//! Storage traits.

use notify_core::{ContextRecord, DeviceRecord, PushRecord};

/// Context (redirection) storage operations.
pub trait ContextStore: Send + Sync {
    /// Find the context record for a context id.
    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Option<ContextRecord>>;

    /// Register or replace the token for a context.
    fn store_context(&self, context_id: &str, token: &str) -> color_eyre::eyre::Result<()>;
}

/// Push notification storage operations.
pub trait NotificationStore: Send + Sync {
    /// Number of records the store prefers per bulk save.
    fn preferred_batch_size(&self) -> i64;

    /// Save one record. `None` means the store did not persist it.
    fn save_one(&self, record: &PushRecord) -> color_eyre::eyre::Result<Option<PushRecord>>;

    /// Save several records in one call, returning those actually saved.
    fn save_many(&self, records: &[PushRecord]) -> color_eyre::eyre::Result<Vec<PushRecord>>;

    /// All records stored for a context, oldest first.
    fn find_by_context(&self, context_id: &str) -> color_eyre::eyre::Result<Vec<PushRecord>>;
}

/// Device details storage operations.
pub trait DeviceStore: Send + Sync {
    /// Find the registration for a uid within a context.
    fn find_by_uid_and_context(
        &self,
        uid: i32,
        context_id: &str,
    ) -> color_eyre::eyre::Result<Option<DeviceRecord>>;

    /// Insert or update one registration.
    fn save_one(&self, record: &DeviceRecord) -> color_eyre::eyre::Result<DeviceRecord>;

    /// Insert or update several registrations in one call.
    fn save_many(&self, records: &[DeviceRecord]) -> color_eyre::eyre::Result<Vec<DeviceRecord>>;
}

/// Combined storage trait.
pub trait AllStorage: ContextStore + NotificationStore + DeviceStore {}

impl<T> AllStorage for T where T: ContextStore + NotificationStore + DeviceStore {}
