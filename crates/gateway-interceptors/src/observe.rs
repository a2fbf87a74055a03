use std::time::Duration;

use gateway_observe::{RequestSummary, ResponseSummary, TraceEvent, TraceOutcome};

use crate::context::{InterceptContext, ProtoRequest};
use crate::errors::{to_http_response, InterceptError};
use crate::response::ResponseBody;
use crate::stages::response_norm::{Disposition, NormalizedResponse};

const UNMATCHED_ACTION: &str = "unmatched";
const UNMATCHED_PATH_FORMAT: &str = "*";

/// Builds the single trace event for a completed request from the final,
/// post-normalization outcome.
pub fn trace_event(
    cx: &InterceptContext,
    req: &dyn ProtoRequest,
    result: &Result<NormalizedResponse, InterceptError>,
    elapsed: Duration,
) -> TraceEvent {
    let (action, path_format) = match cx.route.as_ref() {
        Some(route) => (
            route.descriptor.action.clone(),
            route.descriptor.path_format.clone(),
        ),
        None => (UNMATCHED_ACTION.to_string(), UNMATCHED_PATH_FORMAT.to_string()),
    };

    let request = RequestSummary {
        request_id: cx.request_id.clone(),
        method: req.method().to_string(),
        path: req.path().to_string(),
        caller_id: cx.caller.as_ref().map(|c| c.caller_id.0.clone()),
        tenant: cx.caller.as_ref().map(|c| c.tenant.0.clone()),
        trace_id: cx.trace.trace_id.clone(),
    };

    let (response, outcome) = match result {
        Ok(normalized) => {
            let outcome = match normalized.disposition {
                Disposition::Passthrough => TraceOutcome::Passthrough,
                Disposition::Remapped { from } => TraceOutcome::Remapped { from },
                Disposition::ClientError => TraceOutcome::ClientError,
            };
            (
                ResponseSummary {
                    status: normalized.response.status,
                    body: body_summary(&normalized.response.body),
                    code: normalized.code.map(|c| c.0.to_string()),
                },
                outcome,
            )
        }
        Err(err) => {
            let (status, body) = to_http_response(err);
            (
                ResponseSummary {
                    status,
                    body: Some(body),
                    code: Some(err.code().0.to_string()),
                },
                TraceOutcome::Fault,
            )
        }
    };

    TraceEvent {
        ts_ms: chrono::Utc::now().timestamp_millis(),
        action,
        path_format,
        request,
        response,
        outcome,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}

fn body_summary(body: &ResponseBody) -> Option<serde_json::Value> {
    match body {
        ResponseBody::Empty => None,
        ResponseBody::Json(value) => Some(value.clone()),
        ResponseBody::Bytes { content_type, data } => Some(serde_json::json!({
            "content_type": content_type,
            "len": data.len(),
        })),
    }
}
