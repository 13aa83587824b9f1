//! Ingestion request types.

use crate::IngestError;

/// A batch of push notifications submitted for one context.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct IngestionRequest {
    /// Communication auth token issued to the context.
    pub auth_token: String,
    /// Context (installation) the records belong to.
    pub context_id: String,
    /// Notification entries, in submission order.
    pub records: Vec<RawNotification>,
    /// Address of the submitting host.
    pub host_address: String,
    /// Name of the submitting host.
    pub host_name: String,
    /// Server install path reported by the submitting host.
    pub server_path: String,
}

impl IngestionRequest {
    /// Create a request with the given token and context and no records.
    pub fn new(auth_token: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            context_id: context_id.into(),
            ..Default::default()
        }
    }

    /// Append a notification entry.
    pub fn with_record(mut self, record: RawNotification) -> Self {
        self.records.push(record);
        self
    }

    /// Set the submitting host's address, name and server path.
    pub fn with_source(
        mut self,
        host_address: impl Into<String>,
        host_name: impl Into<String>,
        server_path: impl Into<String>,
    ) -> Self {
        self.host_address = host_address.into();
        self.host_name = host_name.into();
        self.server_path = server_path.into();
        self
    }
}

/// A single notification entry as received on the wire.
///
/// Numeric fields stay textual until transform time.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawNotification {
    pub uid: String,
    pub message_count: String,
    pub message_type: String,
    pub device_platform: String,
    pub device_token: String,
    pub message: String,
}

impl RawNotification {
    /// Parse the uid field.
    pub fn parse_uid(&self) -> Result<i32, IngestError> {
        parse_numeric("uid", &self.uid)
    }

    /// Parse the message count field.
    pub fn parse_message_count(&self) -> Result<i32, IngestError> {
        parse_numeric("message_count", &self.message_count)
    }
}

fn parse_numeric(field: &'static str, value: &str) -> Result<i32, IngestError> {
    value.parse().map_err(|_| IngestError::MalformedNumber {
        field,
        value: value.to_string(),
    })
}

/// True for empty or whitespace-only strings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_fields() {
        let raw = RawNotification {
            uid: "1512".into(),
            message_count: "3".into(),
            ..Default::default()
        };
        assert_eq!(raw.parse_uid().unwrap(), 1512);
        assert_eq!(raw.parse_message_count().unwrap(), 3);
    }

    #[test]
    fn test_malformed_uid() {
        let raw = RawNotification {
            uid: " 12".into(),
            ..Default::default()
        };
        let err = raw.parse_uid().unwrap_err();
        assert_eq!(
            err,
            IngestError::MalformedNumber {
                field: "uid",
                value: " 12".into(),
            }
        );
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \t"));
        assert!(!is_blank(" x "));
    }
}
