use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{body::Body, http::Method, http::Request, middleware, Router};
use futures::FutureExt;
use gateway_interceptors::adapters::http::{handle_unbound, mount_routes, GatewayRoute, HandlerFn};
use gateway_interceptors::prelude::*;
use tower_http::cors::{Any, CorsLayer};

use super::attach::attach_caller;
use super::state::AppState;
use crate::routes;

/// Mounts every gateway route behind the interceptor chain.
///
/// Requests axum cannot route fall back to a chain that binds through the
/// route table, so they are still answered with the error envelope and traced.
/// A declared path hit with an undeclared method gets a traced 405 envelope.
pub fn build_router(state: &AppState) -> Result<Router> {
    let gateway_routes = routes::gateway_routes(state);
    let table = RouteTable::new(gateway_routes.iter().map(GatewayRoute::spec).collect())
        .context("invalid route declaration")?;
    let handlers: Arc<BTreeMap<String, HandlerFn>> = Arc::new(
        gateway_routes
            .iter()
            .map(|route| {
                (
                    route.binding().descriptor.action.clone(),
                    Arc::clone(route.handler()),
                )
            })
            .collect(),
    );

    let method_chain = Arc::new(state.chain(InterceptorChain::new(vec![Box::new(
        ContextInitStage,
    )])));
    let method_not_allowed = move |req: Request<Body>| {
        let chain = Arc::clone(&method_chain);
        async move {
            let method = req.method().to_string();
            handle_unbound(req, &chain, move |_cx, _req| {
                async move { Err(InterceptError::method_not_allowed(&method)) }.boxed()
            })
            .await
        }
    };

    let chain = Arc::new(state.chain(InterceptorChain::standard()));
    let router = mount_routes(Router::new(), gateway_routes, chain, method_not_allowed);

    let fallback_chain = Arc::new(state.chain(InterceptorChain::new(vec![
        Box::new(ContextInitStage),
        Box::new(RouteBindStage {
            table: Arc::new(table),
        }),
        Box::new(PermissionGateStage),
    ])));

    Ok(router
        .fallback(move |req: Request<Body>| {
            let chain = Arc::clone(&fallback_chain);
            let handlers = Arc::clone(&handlers);
            async move {
                handle_unbound(req, &chain, move |cx, preq| {
                    // Only reached when the table binds a path axum did not.
                    let bound = cx
                        .route
                        .as_ref()
                        .and_then(|route| handlers.get(&route.descriptor.action))
                        .cloned();
                    match bound {
                        Some(handler) => handler(cx, preq),
                        None => async move { Err(InterceptError::not_found("route not found")) }
                            .boxed(),
                    }
                })
                .await
            }
        })
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.callers),
            attach_caller,
        ))
        .layer(cors_layer()))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
