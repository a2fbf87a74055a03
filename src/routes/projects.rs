use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;
use futures::FutureExt;
use gateway_interceptors::adapters::http::{handler_fn, GatewayRoute};
use gateway_interceptors::prelude::*;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::catalog::{ProjectCatalog, Removal};
use super::filter::parse_filter;

static PROJECTS_READ: Lazy<ScopeRequirement> = Lazy::new(|| require_scopes!("projects:read"));
static METRICS_READ: Lazy<ScopeRequirement> = Lazy::new(|| require_scopes!("metrics:read"));
static PROJECTS_DELETE: Lazy<ScopeRequirement> =
    Lazy::new(|| require_scopes!("projects:write", "admin"));

const PROJECT_NOT_FOUND: &str = "project not found";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MetricsQuery {
    /// Metric names to return; all metrics when empty.
    metrics: Vec<String>,
    filter: Option<String>,
}

/// In-band error body: a nominal 200 the normalizer re-statuses.
fn in_band_error(message: impl Into<String>) -> HandlerResponse {
    HandlerResponse::ok(json!({ "errors": [message.into()] }))
}

fn project_id(cx: &InterceptContext) -> Result<String, InterceptError> {
    cx.path_param("project_id")
        .map(str::to_string)
        .ok_or_else(|| InterceptError::bad_request("missing project id"))
}

/// `GET /v1/projects/:project_id`
pub(super) fn get_route(catalog: Arc<ProjectCatalog>) -> GatewayRoute {
    GatewayRoute::new(
        Method::GET,
        "projects.get",
        "/v1/projects/:project_id",
        handler_fn(move |cx, _req| {
            let catalog = Arc::clone(&catalog);
            async move {
                let id = project_id(cx)?;
                Ok(match catalog.get(&id) {
                    Some(project) => HandlerResponse::ok(json!({ "data": project })),
                    None => in_band_error(PROJECT_NOT_FOUND),
                })
            }
            .boxed()
        }),
    )
    .secured(PROJECTS_READ.clone())
}

/// `POST /v1/projects/:project_id/metrics`
pub(super) fn metrics_route(catalog: Arc<ProjectCatalog>) -> GatewayRoute {
    GatewayRoute::new(
        Method::POST,
        "metrics.query",
        "/v1/projects/:project_id/metrics",
        handler_fn(move |cx, req| {
            let catalog = Arc::clone(&catalog);
            async move {
                let id = project_id(cx)?;
                let Some(project) = catalog.get(&id) else {
                    return Err(InterceptError::not_found(PROJECT_NOT_FOUND));
                };

                let body = req.read_json().await?;
                let query: MetricsQuery = match serde_json::from_value(body) {
                    Ok(query) => query,
                    Err(err) => {
                        debug!(error = %err, "metrics query rejected");
                        return Ok(in_band_error("invalid query body"));
                    }
                };

                let clauses = match query.filter.as_deref().map(parse_filter).transpose() {
                    Ok(clauses) => clauses.unwrap_or_default(),
                    Err(err) => {
                        debug!(error = %err, "metrics filter rejected");
                        return Ok(in_band_error("invalid filter syntax"));
                    }
                };

                let metrics: BTreeMap<String, f64> = if query.metrics.is_empty() {
                    project.metrics.clone()
                } else {
                    let mut selected = BTreeMap::new();
                    for name in &query.metrics {
                        match project.metrics.get(name) {
                            Some(value) => {
                                selected.insert(name.clone(), *value);
                            }
                            None => return Ok(in_band_error(format!("metric {name} not found"))),
                        }
                    }
                    selected
                };

                Ok(HandlerResponse::ok(json!({
                    "data": {
                        "project_id": project.id,
                        "metrics": metrics,
                        "filter": clauses,
                    }
                })))
            }
            .boxed()
        }),
    )
    .secured(METRICS_READ.clone())
}

/// `DELETE /v1/projects/:project_id`
pub(super) fn delete_route(catalog: Arc<ProjectCatalog>) -> GatewayRoute {
    GatewayRoute::new(
        Method::DELETE,
        "projects.delete",
        "/v1/projects/:project_id",
        handler_fn(move |cx, _req| {
            let catalog = Arc::clone(&catalog);
            async move {
                let id = project_id(cx)?;
                match catalog.remove_unlocked(&id) {
                    Removal::Missing => Ok(in_band_error(PROJECT_NOT_FOUND)),
                    Removal::Locked => Err(InterceptError::forbidden("forbidden resource")),
                    Removal::Removed(_) => {
                        Ok(HandlerResponse::ok(json!({ "data": { "deleted": id } })))
                    }
                }
            }
            .boxed()
        }),
    )
    .secured(PROJECTS_DELETE.clone())
}
