use crate::{
    class::{RetryClass, Severity},
    kind::ErrorKind,
    model::ErrorObj,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{"errors": [...]}` body returned for every client-facing error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub errors: Vec<String>,
}

impl ErrorEnvelope {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "errors": self.errors })
    }
}

/// What a caller sees for a server fault.
#[derive(Debug, Serialize)]
pub struct PublicErrorView {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Full classification for logs; never sent to callers.
#[derive(Debug, Serialize)]
pub struct AuditErrorView {
    pub code: &'static str,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_dev: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorObj {
    pub fn to_public(&self) -> PublicErrorView {
        PublicErrorView {
            code: self.code.0,
            message: self.message_user.clone(),
            correlation_id: self.correlation_id.clone(),
        }
    }

    /// Only the user message is exposed; the dev message stays server-side.
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::single(self.message_user.clone())
    }

    pub fn to_audit(&self) -> AuditErrorView {
        AuditErrorView {
            code: self.code.0,
            kind: self.kind,
            http_status: self.http_status,
            retryable: self.retryable,
            severity: self.severity,
            message_dev: self.message_dev.clone(),
            meta: self.meta.clone(),
            correlation_id: self.correlation_id.clone(),
            trace_id: self.trace.as_ref().and_then(|t| t.trace_id.clone()),
        }
    }
}
