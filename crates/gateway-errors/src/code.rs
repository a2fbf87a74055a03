use crate::{
    class::{RetryClass, Severity},
    kind::ErrorKind,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match REGISTRY.get_key_value(s.as_str()) {
            Some((key, _)) => Ok(ErrorCode(*key)),
            None => Ok(ErrorCode(Box::leak(s.into_boxed_str()))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode("AUTH.UNAUTHENTICATED");
    pub const AUTH_PERMISSION_DENIED: ErrorCode = ErrorCode("AUTH.PERMISSION_DENIED");
    pub const AUTH_FORBIDDEN: ErrorCode = ErrorCode("AUTH.FORBIDDEN");
    pub const CLIENT_BAD_REQUEST: ErrorCode = ErrorCode("CLIENT.BAD_REQUEST");
    pub const CLIENT_NOT_FOUND: ErrorCode = ErrorCode("CLIENT.NOT_FOUND");
    pub const CLIENT_METHOD_NOT_ALLOWED: ErrorCode = ErrorCode("CLIENT.METHOD_NOT_ALLOWED");
    pub const CLIENT_CONFLICT: ErrorCode = ErrorCode("CLIENT.CONFLICT");
    pub const SCHEMA_VALIDATION: ErrorCode = ErrorCode("SCHEMA.VALIDATION_FAILED");
    pub const QUOTA_RATELIMIT: ErrorCode = ErrorCode("QUOTA.RATE_LIMITED");
    pub const CONTEXT_MISSING: ErrorCode = ErrorCode("CONTEXT.MISSING");
    pub const UPSTREAM_UNAVAILABLE: ErrorCode = ErrorCode("UPSTREAM.UNAVAILABLE");
    pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode("UNKNOWN.INTERNAL");
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: AUTH_UNAUTHENTICATED,
        kind: ErrorKind::Auth,
        http_status: 401,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Please sign in.",
    });

    add(CodeSpec {
        code: AUTH_PERMISSION_DENIED,
        kind: ErrorKind::PermissionDenied,
        http_status: 401,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Not enough permissions",
    });

    add(CodeSpec {
        code: AUTH_FORBIDDEN,
        kind: ErrorKind::Auth,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "You don't have permission to perform this action.",
    });

    add(CodeSpec {
        code: CLIENT_BAD_REQUEST,
        kind: ErrorKind::Client,
        http_status: 400,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Bad request.",
    });

    add(CodeSpec {
        code: CLIENT_NOT_FOUND,
        kind: ErrorKind::NotFound,
        http_status: 404,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Resource not found.",
    });

    add(CodeSpec {
        code: CLIENT_METHOD_NOT_ALLOWED,
        kind: ErrorKind::Client,
        http_status: 405,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Method not allowed.",
    });

    add(CodeSpec {
        code: CLIENT_CONFLICT,
        kind: ErrorKind::Conflict,
        http_status: 409,
        retryable: RetryClass::Transient,
        severity: Severity::Warn,
        default_user_msg: "The resource was modified concurrently. Please retry.",
    });

    add(CodeSpec {
        code: SCHEMA_VALIDATION,
        kind: ErrorKind::Schema,
        http_status: 422,
        retryable: RetryClass::Permanent,
        severity: Severity::Info,
        default_user_msg: "Invalid request.",
    });

    add(CodeSpec {
        code: QUOTA_RATELIMIT,
        kind: ErrorKind::RateLimit,
        http_status: 429,
        retryable: RetryClass::Transient,
        severity: Severity::Warn,
        default_user_msg: "Too many requests. Please retry later.",
    });

    add(CodeSpec {
        code: CONTEXT_MISSING,
        kind: ErrorKind::Internal,
        http_status: 500,
        retryable: RetryClass::Never,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    add(CodeSpec {
        code: UPSTREAM_UNAVAILABLE,
        kind: ErrorKind::Upstream,
        http_status: 503,
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Upstream service is unavailable. Please retry later.",
    });

    add(CodeSpec {
        code: UNKNOWN_INTERNAL,
        kind: ErrorKind::Unknown,
        http_status: 500,
        retryable: RetryClass::Transient,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).expect("unregistered ErrorCode")
}
