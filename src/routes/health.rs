use axum::http::Method;
use futures::FutureExt;
use gateway_interceptors::adapters::http::{handler_fn, GatewayRoute};
use gateway_interceptors::prelude::HandlerResponse;
use gateway_observe::prelude::TraceDispatcher;
use serde_json::json;

/// `GET /health`. Open route: no scope requirement, no caller needed.
pub(super) fn route(tracer: Option<TraceDispatcher>) -> GatewayRoute {
    GatewayRoute::new(
        Method::GET,
        "health.check",
        "/health",
        handler_fn(move |_cx, _req| {
            let dropped = tracer.as_ref().map(TraceDispatcher::dropped);
            async move {
                Ok(HandlerResponse::ok(json!({
                    "status": "ok",
                    "time": chrono::Utc::now().to_rfc3339(),
                    "trace_dropped": dropped,
                })))
            }
            .boxed()
        }),
    )
}
