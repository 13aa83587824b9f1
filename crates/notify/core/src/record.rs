//! Persistence-ready records.

use chrono::Timelike as _;

/// Text format of `created_at_utc`, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored push notification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PushRecord {
    pub uid: i32,
    pub context_id: String,
    pub message_count: i32,
    pub message_type: String,
    /// UTC wall clock at transform time, truncated to whole seconds.
    pub created_at_utc: chrono::NaiveDateTime,
    pub source_ip: String,
    pub source_host: String,
    pub source_path: String,
}

impl PushRecord {
    /// `created_at_utc` rendered with [`TIMESTAMP_FORMAT`].
    pub fn created_at_text(&self) -> String {
        self.created_at_utc.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Device registration for a uid within a context.
///
/// Keyed by `(uid, context_id)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceRecord {
    pub uid: i32,
    pub context_id: String,
    pub device_platform: String,
    pub device_token: String,
}

impl DeviceRecord {
    /// Create an empty registration for a uid.
    pub fn new(uid: i32, context_id: impl Into<String>) -> Self {
        Self {
            uid,
            context_id: context_id.into(),
            device_platform: String::new(),
            device_token: String::new(),
        }
    }
}

/// Binding of a context to its communication auth token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContextRecord {
    pub context_id: String,
    pub token: String,
}

/// Current UTC time with sub-second precision dropped.
pub fn utc_now_seconds() -> chrono::NaiveDateTime {
    let now = chrono::Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}
