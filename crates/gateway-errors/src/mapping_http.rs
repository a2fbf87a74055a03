use http::StatusCode;

use crate::model::ErrorObj;

/// Status to put on the wire. An out-of-range override degrades to 500.
pub fn to_http_status(err: &ErrorObj) -> StatusCode {
    StatusCode::from_u16(err.http_status)
        .ok()
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
