use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the trace sink learns about the inbound request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub request_id: String,
    pub method: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// The final response as it left the gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TraceOutcome {
    Passthrough,
    Remapped { from: u16 },
    ClientError,
    Fault,
}

impl TraceOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            TraceOutcome::Passthrough => "passthrough",
            TraceOutcome::Remapped { .. } => "remapped",
            TraceOutcome::ClientError => "client_error",
            TraceOutcome::Fault => "fault",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub ts_ms: i64,
    pub action: String,
    pub path_format: String,
    pub request: RequestSummary,
    pub response: ResponseSummary,
    pub outcome: TraceOutcome,
    pub elapsed_ms: u64,
}
