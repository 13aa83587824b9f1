//! Wire request and response bodies.

use notify_core::{IngestionRequest, NotificationResponse, RawNotification, ResultCode, Status};
use serde::{Deserialize, Deserializer, Serialize};

/// Push notification submission body.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationRequestDto {
    #[serde(deserialize_with = "null_as_default")]
    pub comm_auth_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mobile_context: String,
    #[serde(deserialize_with = "null_as_default")]
    pub host_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub host_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tomcat_home: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notification_data: Vec<NotificationDataDto>,
}

/// One notification entry on the wire.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationDataDto {
    #[serde(deserialize_with = "null_as_default")]
    pub uid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_count: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device_platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

// Explicit nulls read the same as absent fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<NotificationDataDto> for RawNotification {
    fn from(dto: NotificationDataDto) -> Self {
        Self {
            uid: dto.uid,
            message_count: dto.message_count,
            message_type: dto.message_type,
            device_platform: dto.device_platform,
            device_token: dto.device_token,
            message: dto.message,
        }
    }
}

impl From<NotificationRequestDto> for IngestionRequest {
    fn from(dto: NotificationRequestDto) -> Self {
        Self {
            auth_token: dto.comm_auth_token,
            context_id: dto.mobile_context,
            records: dto.notification_data.into_iter().map(Into::into).collect(),
            host_address: dto.host_address,
            host_name: dto.host_name,
            server_path: dto.tomcat_home,
        }
    }
}

/// Response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub result_code: ResultCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NotificationDataResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Ingestion outcome inside the envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDataResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<FailedUids>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedUids {
    pub failed_uid_list: Vec<i32>,
}

impl From<NotificationResponse> for NotificationDataResponse {
    fn from(response: NotificationResponse) -> Self {
        let failed = match response.status {
            Status::Success => Some(FailedUids {
                failed_uid_list: response.failed_uids,
            }),
            Status::Failed => None,
        };

        Self {
            status: response.status,
            response: failed,
            error_message: response.error_message,
        }
    }
}
