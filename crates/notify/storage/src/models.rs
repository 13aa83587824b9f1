//! Database models.

use diesel::prelude::*;
use notify_core::{ContextRecord, DeviceRecord, PushRecord};

use crate::schema::{device_details, push_notifications, redirections};

/// Redirection (context) record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = redirections, primary_key(context_id))]
pub struct RedirectionRow {
    pub context_id: String,
    pub token: String,
}

impl From<RedirectionRow> for ContextRecord {
    fn from(row: RedirectionRow) -> Self {
        Self {
            context_id: row.context_id,
            token: row.token,
        }
    }
}

/// New redirection for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = redirections)]
pub struct NewRedirection<'a> {
    pub context_id: &'a str,
    pub token: &'a str,
}

/// Push notification record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = push_notifications)]
pub struct PushNotificationRow {
    pub id: i32,
    pub uid: i32,
    pub context_id: String,
    pub message_count: i32,
    pub message_type: String,
    pub created_at_utc: chrono::NaiveDateTime,
    pub source_ip: String,
    pub source_host: String,
    pub source_path: String,
}

impl From<PushNotificationRow> for PushRecord {
    fn from(row: PushNotificationRow) -> Self {
        Self {
            uid: row.uid,
            context_id: row.context_id,
            message_count: row.message_count,
            message_type: row.message_type,
            created_at_utc: row.created_at_utc,
            source_ip: row.source_ip,
            source_host: row.source_host,
            source_path: row.source_path,
        }
    }
}

/// New push notification for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = push_notifications)]
pub struct NewPushNotification<'a> {
    pub uid: i32,
    pub context_id: &'a str,
    pub message_count: i32,
    pub message_type: &'a str,
    pub created_at_utc: chrono::NaiveDateTime,
    pub source_ip: &'a str,
    pub source_host: &'a str,
    pub source_path: &'a str,
}

impl<'a> From<&'a PushRecord> for NewPushNotification<'a> {
    fn from(record: &'a PushRecord) -> Self {
        Self {
            uid: record.uid,
            context_id: &record.context_id,
            message_count: record.message_count,
            message_type: &record.message_type,
            created_at_utc: record.created_at_utc,
            source_ip: &record.source_ip,
            source_host: &record.source_host,
            source_path: &record.source_path,
        }
    }
}

/// Device details record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = device_details, primary_key(uid, context_id))]
pub struct DeviceDetailsRow {
    pub uid: i32,
    pub context_id: String,
    pub device_platform: String,
    pub device_token: String,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<DeviceDetailsRow> for DeviceRecord {
    fn from(row: DeviceDetailsRow) -> Self {
        Self {
            uid: row.uid,
            context_id: row.context_id,
            device_platform: row.device_platform,
            device_token: row.device_token,
        }
    }
}

/// New device details for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = device_details)]
pub struct NewDeviceDetails<'a> {
    pub uid: i32,
    pub context_id: &'a str,
    pub device_platform: &'a str,
    pub device_token: &'a str,
    pub updated_at: chrono::NaiveDateTime,
}
