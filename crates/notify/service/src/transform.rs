//! Conversion of raw notification entries into persistence-ready records.

use notify_core::{DeviceRecord, IngestError, IngestionRequest, PushRecord, RawNotification};
use notify_storage::DeviceStore;

/// Build the push record for one entry.
pub fn to_push_record(
    context_id: &str,
    raw: &RawNotification,
    request: &IngestionRequest,
) -> Result<PushRecord, IngestError> {
    Ok(PushRecord {
        uid: raw.parse_uid()?,
        context_id: context_id.to_string(),
        message_count: raw.parse_message_count()?,
        message_type: raw.message_type.clone(),
        created_at_utc: notify_core::utc_now_seconds(),
        source_ip: request.host_address.trim().to_string(),
        source_host: request.host_name.trim().to_string(),
        source_path: request.server_path.trim().to_string(),
    })
}

/// Build the device record for one entry, merging into any stored registration.
///
/// Platform and token always come from the entry.
pub fn to_device_record<D>(
    store: &D,
    context_id: &str,
    raw: &RawNotification,
) -> Result<DeviceRecord, IngestError>
where
    D: DeviceStore + ?Sized,
{
    let uid = raw.parse_uid()?;

    let existing = match store.find_by_uid_and_context(uid, context_id) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(uid, context_id, error = %e, "device lookup failed, creating new record");
            None
        }
    };

    let mut device = existing.unwrap_or_else(|| DeviceRecord::new(uid, context_id));
    device.device_platform = raw.device_platform.clone();
    device.device_token = raw.device_token.clone();

    Ok(device)
}
