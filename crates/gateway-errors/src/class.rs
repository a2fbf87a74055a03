use serde::{Deserialize, Serialize};

/// How loudly a failure is reported. Drives the log level of faults that
/// leave the interceptor chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// `Error` and above are logged at `error!`, the rest at `warn!`.
    pub fn is_alerting(self) -> bool {
        self >= Severity::Error
    }
}

/// Whether repeating the same request can succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryClass {
    /// Retrying is pointless until the deployment is fixed.
    Never,
    Transient,
    Permanent,
}

impl RetryClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            RetryClass::Never => "never",
            RetryClass::Transient => "transient",
            RetryClass::Permanent => "permanent",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, RetryClass::Transient)
    }
}
