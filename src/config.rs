//! Gateway configuration: YAML file, environment overrides, CLI flags (in
//! that order of increasing precedence).

use std::collections::BTreeMap;
use std::env;
use std::net::SocketAddr;

use gateway_types::prelude::{CallerContext, Validate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const HTTP_ENV: &str = "ANALYTICS_GATEWAY_HTTP";
pub const TRACE_CAPACITY_ENV: &str = "ANALYTICS_GATEWAY_TRACE_CAPACITY";
pub const TRACE_ENABLED_ENV: &str = "ANALYTICS_GATEWAY_TRACE_ENABLED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },
    #[error("caller entry {index}: {reason}")]
    InvalidCaller { index: usize, reason: String },
    #[error("duplicate caller token at entry {0}")]
    DuplicateToken(usize),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub http: HttpConfig,
    pub trace: TraceConfig,
    /// Static bearer-token table used by the development context attachment.
    pub callers: Vec<CallerEntry>,
    /// Demo project catalog served by the analytics routes.
    pub projects: Vec<ProjectRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub listen: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8720)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSinkKind {
    #[default]
    Log,
    Noop,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub enabled: bool,
    pub queue_capacity: usize,
    pub sink: TraceSinkKind,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: 1024,
            sink: TraceSinkKind::Log,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallerEntry {
    pub token: String,
    pub caller: CallerContext,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl GatewayConfig {
    /// Applies `ANALYTICS_GATEWAY_*` variables on top of the loaded file.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = env::var(HTTP_ENV) {
            self.http.listen = raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                key: HTTP_ENV,
                value: raw.clone(),
            })?;
            info!(listen = %self.http.listen, "listen address overridden from environment");
        }

        if let Ok(raw) = env::var(TRACE_CAPACITY_ENV) {
            self.trace.queue_capacity = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| ConfigError::InvalidOverride {
                    key: TRACE_CAPACITY_ENV,
                    value: raw.clone(),
                })?;
        }

        if let Ok(raw) = env::var(TRACE_ENABLED_ENV) {
            self.trace.enabled = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidOverride {
                key: TRACE_ENABLED_ENV,
                value: raw.clone(),
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut tokens = std::collections::BTreeSet::new();
        for (index, entry) in self.callers.iter().enumerate() {
            if entry.token.trim().is_empty() {
                return Err(ConfigError::InvalidCaller {
                    index,
                    reason: "empty token".into(),
                });
            }
            entry
                .caller
                .validate()
                .map_err(|err| ConfigError::InvalidCaller {
                    index,
                    reason: err.to_string(),
                })?;
            if !tokens.insert(entry.token.as_str()) {
                return Err(ConfigError::DuplicateToken(index));
            }
        }
        if self.trace.enabled && self.trace.queue_capacity == 0 {
            warn!("trace.queue_capacity is 0; using a queue of 1");
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SAMPLE: &str = r#"
http:
  listen: 0.0.0.0:9000
trace:
  sink: noop
callers:
  - token: dev-reader
    caller:
      kind: User
      caller_id: u_reader
      tenant: acme
      permissions: ["projects:read", "metrics:read"]
projects:
  - id: p1
    name: Storefront
    metrics:
      sessions: 1200
"#;

    fn clear_env() {
        env::remove_var(HTTP_ENV);
        env::remove_var(TRACE_CAPACITY_ENV);
        env::remove_var(TRACE_ENABLED_ENV);
    }

    #[test]
    fn parses_yaml_with_defaults_for_missing_fields() {
        let config: GatewayConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.http.listen.port(), 9000);
        assert_eq!(config.trace.sink, TraceSinkKind::Noop);
        assert!(config.trace.enabled);
        assert_eq!(config.trace.queue_capacity, 1024);
        assert!(config.callers[0].caller.has_scope("metrics:read"));
        assert_eq!(config.callers[0].caller.tenant.0, "acme");
        assert!(!config.projects[0].locked);
        config.validate().unwrap();
    }

    #[test]
    #[serial]
    fn env_overrides_win_over_file() {
        clear_env();
        env::set_var(HTTP_ENV, "127.0.0.1:7000");
        env::set_var(TRACE_ENABLED_ENV, "off");
        let mut config: GatewayConfig = serde_yaml::from_str(SAMPLE).unwrap();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.http.listen.port(), 7000);
        assert!(!config.trace.enabled);
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_bad_override() {
        clear_env();
        env::set_var(TRACE_CAPACITY_ENV, "0");
        let mut config = GatewayConfig::default();
        assert!(matches!(
            config.apply_env_overrides(),
            Err(ConfigError::InvalidOverride { .. })
        ));
        clear_env();
    }

    #[test]
    fn duplicate_tokens_are_rejected() {
        let mut config: GatewayConfig = serde_yaml::from_str(SAMPLE).unwrap();
        let dup = config.callers[0].clone();
        config.callers.push(dup);
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateToken(1))));
    }
}
