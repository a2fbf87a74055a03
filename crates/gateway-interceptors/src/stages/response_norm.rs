use gateway_errors::prelude::ErrorCode;
use serde_json::Value;
use tracing::debug;

use crate::errors::InterceptError;
use crate::response::{HandlerResponse, HandlerResult, ResponseBody, JSON_CONTENT_TYPE};

/// Substring that turns an in-band error into a 404. Case-sensitive.
pub const NOT_FOUND_MARKER: &str = "not found";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Passthrough,
    Remapped { from: u16 },
    ClientError,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedResponse {
    pub response: HandlerResponse,
    pub disposition: Disposition,
    pub code: Option<ErrorCode>,
}

/// Final shaping of handler output.
///
/// * raised 4xx errors become `{"errors": [message]}` with their status;
/// * raised faults are handed back unchanged;
/// * a 200 whose JSON object carries a non-null `errors` field is re-statused
///   to 404 or 400 with the body left as is;
/// * everything else passes through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn normalize(&self, result: HandlerResult) -> Result<NormalizedResponse, InterceptError> {
        match result {
            Ok(response) => Ok(self.remap(response)),
            Err(err) if err.is_client_error() => {
                let obj = err.into_inner();
                Ok(NormalizedResponse {
                    response: HandlerResponse::json(obj.http_status, obj.to_envelope().to_value()),
                    disposition: Disposition::ClientError,
                    code: Some(obj.code),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn remap(&self, mut response: HandlerResponse) -> NormalizedResponse {
        match remapped_status(response.status, &response.body) {
            Some(status) => {
                debug!(from = response.status, to = status, "in-band errors remapped");
                let from = response.status;
                response.status = status;
                NormalizedResponse {
                    response,
                    disposition: Disposition::Remapped { from },
                    code: None,
                }
            }
            None => NormalizedResponse {
                response,
                disposition: Disposition::Passthrough,
                code: None,
            },
        }
    }
}

/// Status a successful response should carry instead of 200, if any.
pub fn remapped_status(status: u16, body: &ResponseBody) -> Option<u16> {
    if status != 200 {
        return None;
    }
    match body {
        ResponseBody::Json(value) => classify_body(value),
        ResponseBody::Bytes { content_type, data } if is_json(content_type) => {
            serde_json::from_slice::<Value>(data)
                .ok()
                .and_then(|value| classify_body(&value))
        }
        _ => None,
    }
}

/// `None` unless `body` is an object with a non-null `errors` member.
pub fn classify_body(body: &Value) -> Option<u16> {
    let errors = body.as_object()?.get("errors")?;
    if errors.is_null() {
        return None;
    }
    let first = errors.as_array().and_then(|items| items.first());
    match first.and_then(Value::as_str) {
        Some(message) if message.contains(NOT_FOUND_MARKER) => Some(404),
        _ => Some(400),
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE))
        .unwrap_or(false)
}
