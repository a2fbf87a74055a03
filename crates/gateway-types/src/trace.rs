#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Distributed-trace identifiers propagated from inbound headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TraceContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub baggage: serde_json::Map<String, serde_json::Value>,
}

impl TraceContext {
    /// Context carrying only an upstream trace id, if one was supplied.
    pub fn from_trace_id(trace_id: Option<String>) -> Self {
        Self {
            trace_id: trace_id.filter(|id| !id.trim().is_empty()),
            ..Self::default()
        }
    }
}
