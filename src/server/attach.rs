use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use gateway_types::prelude::CallerContext;
use tracing::debug;

use crate::config::CallerEntry;

/// Static bearer-token to caller table. Stands in for the real upstream
/// authentication layer; the gateway core only ever reads its result.
#[derive(Clone, Debug, Default)]
pub struct CallerDirectory {
    by_token: HashMap<String, CallerContext>,
}

impl CallerDirectory {
    pub fn from_entries(entries: &[CallerEntry]) -> Self {
        Self {
            by_token: entries
                .iter()
                .map(|entry| (entry.token.clone(), entry.caller.clone()))
                .collect(),
        }
    }

    pub fn lookup(&self, token: &str) -> Option<&CallerContext> {
        self.by_token.get(token)
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

/// Attaches the caller context for a known bearer token. Unknown or absent
/// tokens attach nothing and the request continues.
pub async fn attach_caller(
    State(directory): State<Arc<CallerDirectory>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match extract_token(&req).and_then(|token| directory.lookup(&token).cloned()) {
        Some(caller) => {
            req.extensions_mut().insert(caller);
        }
        None => debug!(path = req.uri().path(), "no caller attached"),
    }
    next.run(req).await
}

fn extract_token(req: &Request<Body>) -> Option<String> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_types::prelude::CallerKind;

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/v1/projects/p1");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_token_only() {
        assert_eq!(extract_token(&request(Some("Bearer abc "))).as_deref(), Some("abc"));
        assert_eq!(extract_token(&request(Some("Basic abc"))), None);
        assert_eq!(extract_token(&request(Some("Bearer   "))), None);
        assert_eq!(extract_token(&request(None)), None);
    }

    #[test]
    fn directory_resolves_configured_tokens() {
        let directory = CallerDirectory::from_entries(&[CallerEntry {
            token: "t1".into(),
            caller: CallerContext::new(CallerKind::Service, "svc", ["metrics:read"]),
        }]);
        assert_eq!(directory.len(), 1);
        assert!(directory.lookup("t1").is_some());
        assert!(directory.lookup("t2").is_none());
    }
}
