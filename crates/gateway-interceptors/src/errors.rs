use gateway_errors::prelude::*;
use serde_json::Value;
use thiserror::Error;

use crate::context::InterceptContext;

#[derive(Debug, Error)]
#[error("{}: {}", .0.code, .0.message_user)]
pub struct InterceptError(pub ErrorObj);

impl InterceptError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn status(&self) -> u16 {
        self.0.http_status
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn is_client_error(&self) -> bool {
        self.0.is_client_error()
    }

    pub fn internal(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Internal error. Please retry later.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn schema(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Invalid request.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn from_error(err: ErrorObj) -> Self {
        InterceptError(err)
    }

    pub fn from_public(code: ErrorCode, msg: &str) -> Self {
        InterceptError(ErrorBuilder::new(code).user_msg(msg).build())
    }

    /// The caller context slot was empty: the upstream attachment never ran.
    pub fn context_missing() -> Self {
        InterceptError(
            ErrorBuilder::new(codes::CONTEXT_MISSING)
                .dev_msg("caller context not attached to request state")
                .build(),
        )
    }

    /// Fixed 401 body. Missing scopes are never part of the error.
    pub fn permission_denied() -> Self {
        InterceptError(ErrorBuilder::new(codes::AUTH_PERMISSION_DENIED).build())
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::from_public(codes::CLIENT_BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::from_public(codes::CLIENT_NOT_FOUND, msg)
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::from_public(codes::AUTH_FORBIDDEN, msg)
    }

    pub fn method_not_allowed(method: &str) -> Self {
        Self::from_public(
            codes::CLIENT_METHOD_NOT_ALLOWED,
            &format!("method {method} not allowed"),
        )
    }

    /// A handler-raised error carrying an explicit HTTP status and message.
    /// Statuses outside 400..=599 are not errors and become a plain 500.
    pub fn http(status: u16, msg: &str) -> Self {
        let status = if (400..=599).contains(&status) { status } else { 500 };
        let code = match status {
            400 => codes::CLIENT_BAD_REQUEST,
            401 => codes::AUTH_UNAUTHENTICATED,
            403 => codes::AUTH_FORBIDDEN,
            404 => codes::CLIENT_NOT_FOUND,
            405 => codes::CLIENT_METHOD_NOT_ALLOWED,
            409 => codes::CLIENT_CONFLICT,
            422 => codes::SCHEMA_VALIDATION,
            429 => codes::QUOTA_RATELIMIT,
            400..=499 => codes::CLIENT_BAD_REQUEST,
            502..=504 => codes::UPSTREAM_UNAVAILABLE,
            _ => codes::UNKNOWN_INTERNAL,
        };
        InterceptError(
            ErrorBuilder::new(code)
                .user_msg(msg)
                .http_status(status)
                .build(),
        )
    }

    /// Stamps request identity onto a fault leaving the chain: correlation id,
    /// trace context, and `route`/`tenant` meta for log labels.
    pub fn annotate(mut self, cx: &InterceptContext) -> Self {
        let obj = &mut self.0;
        if obj.correlation_id.is_none() && !cx.request_id.is_empty() {
            obj.correlation_id = Some(cx.request_id.clone());
        }
        if obj.trace.is_none() {
            obj.trace = Some(cx.trace.clone());
        }
        if let Some(route) = &cx.route {
            obj.meta
                .entry("route")
                .or_insert_with(|| Value::String(route.descriptor.action.clone()));
        }
        if let Some(caller) = &cx.caller {
            obj.meta
                .entry("tenant")
                .or_insert_with(|| Value::String(caller.tenant.0.clone()));
        }
        self
    }
}

/// Client errors render as the `{"errors": [...]}` envelope; faults render
/// as the public view so they stay distinguishable upstream.
pub fn to_http_response(err: &InterceptError) -> (u16, serde_json::Value) {
    let obj = &err.0;
    if obj.is_client_error() {
        return (obj.http_status, obj.to_envelope().to_value());
    }
    let public = obj.to_public();
    (
        obj.http_status,
        serde_json::json!({
            "code": public.code,
            "message": public.message,
            "correlation_id": public.correlation_id
        }),
    )
}
