use crate::{
    class::{RetryClass, Severity},
    code::ErrorCode,
    kind::ErrorKind,
};
use gateway_types::trace::TraceContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A classified error as it travels through the gateway.
///
/// `message_user` is the only text that may reach a caller; everything else
/// stays in logs and traces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorObj {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub message_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_dev: Option<String>,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceContext>,
}

impl ErrorObj {
    /// True for the 4xx family, the only class the gateway recovers locally.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status)
    }

    pub fn is_server_fault(&self) -> bool {
        !self.is_client_error()
    }
}
