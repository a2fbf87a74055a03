use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::context::{InterceptContext, ProtoRequest, ProtoResponse, RouteBinding};
use crate::errors::InterceptError;
use crate::policy::template::match_template;
use crate::policy::RouteSpec;
use crate::response::{HandlerResult, ResponseBody, JSON_CONTENT_TYPE};
use crate::stages::InterceptorChain;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::handler::Handler;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use futures::future::BoxFuture;
use gateway_errors::mapping_http::to_http_status;
use gateway_types::prelude::{CallerContext, RouteDescriptor, ScopeRequirement};
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::warn;

const BODY_LIMIT: usize = 1_048_576;
const REQUEST_ID: &str = "x-request-id";

pub struct AxumReq<'a> {
    pub req: &'a mut Request<Body>,
    pub cached_json: Option<serde_json::Value>,
}

pub struct AxumRes {
    pub headers: http::HeaderMap,
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl Default for AxumRes {
    fn default() -> Self {
        Self {
            headers: http::HeaderMap::new(),
            status: StatusCode::OK,
            body: ResponseBody::Empty,
        }
    }
}

#[async_trait]
impl ProtoRequest for AxumReq<'_> {
    fn method(&self) -> &str {
        self.req.method().as_str()
    }

    fn path(&self) -> &str {
        self.req.uri().path()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.req
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    async fn read_json(&mut self) -> Result<serde_json::Value, InterceptError> {
        if let Some(value) = self.cached_json.clone() {
            return Ok(value);
        }

        let body = std::mem::take(self.req.body_mut());
        let bytes = to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| InterceptError::bad_request(&format!("unreadable body: {e}")))?;
        if bytes.is_empty() {
            *self.req.body_mut() = Body::empty();
            return Ok(serde_json::json!({}));
        }
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| InterceptError::bad_request(&format!("invalid JSON body: {e}")))?;
        *self.req.body_mut() = Body::from(bytes);
        self.cached_json = Some(value.clone());
        Ok(value)
    }
}

#[async_trait]
impl ProtoResponse for AxumRes {
    fn set_status(&mut self, code: u16) {
        self.status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        if let (Ok(header_name), Ok(header_value)) =
            (HeaderName::from_str(name), HeaderValue::from_str(value))
        {
            self.headers.insert(header_name, header_value);
        }
    }

    async fn write_body(&mut self, body: ResponseBody) -> Result<(), InterceptError> {
        self.body = body;
        Ok(())
    }
}

/// Runs one axum request through `chain` for the route described by `binding`.
///
/// The caller context is taken from the request extensions, where the
/// upstream attachment middleware put it.
pub async fn handle_with_chain<F>(
    req: Request<Body>,
    chain: &InterceptorChain,
    binding: &RouteBinding,
    handler: F,
) -> Response
where
    F: for<'a> FnOnce(
            &'a mut InterceptContext,
            &'a mut dyn ProtoRequest,
        ) -> BoxFuture<'a, HandlerResult>
        + Send,
{
    let mut cx = InterceptContext::default().with_route(binding.clone());
    if let Some(params) = match_template(&binding.descriptor.path_format, req.uri().path()) {
        cx.path_params = params;
    }
    run(req, chain, cx, handler).await
}

/// Like [`handle_with_chain`] for requests axum could not route; the chain is
/// expected to bind the route itself (see `RouteBindStage`).
pub async fn handle_unbound<F>(req: Request<Body>, chain: &InterceptorChain, handler: F) -> Response
where
    F: for<'a> FnOnce(
            &'a mut InterceptContext,
            &'a mut dyn ProtoRequest,
        ) -> BoxFuture<'a, HandlerResult>
        + Send,
{
    run(req, chain, InterceptContext::default(), handler).await
}

async fn run<F>(
    mut req: Request<Body>,
    chain: &InterceptorChain,
    mut cx: InterceptContext,
    handler: F,
) -> Response
where
    F: for<'a> FnOnce(
            &'a mut InterceptContext,
            &'a mut dyn ProtoRequest,
        ) -> BoxFuture<'a, HandlerResult>
        + Send,
{
    cx.caller = req.extensions_mut().remove::<CallerContext>();
    let mut preq = AxumReq {
        req: &mut req,
        cached_json: None,
    };
    let mut pres = AxumRes::default();

    match chain.run_with_handler(cx, &mut preq, &mut pres, handler).await {
        Ok(()) => render(pres),
        Err(err) => render_fault(&err),
    }
}

fn render(pres: AxumRes) -> Response {
    let (content_type, bytes) = match pres.body {
        ResponseBody::Empty => (None, Vec::new()),
        ResponseBody::Json(value) => (
            Some(JSON_CONTENT_TYPE.to_string()),
            serde_json::to_vec(&value).unwrap_or_default(),
        ),
        ResponseBody::Bytes { content_type, data } => (Some(content_type), data),
    };
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = pres.status;
    *response.headers_mut() = pres.headers;
    if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    response
}

fn render_fault(err: &InterceptError) -> Response {
    let (_, json) = crate::errors::to_http_response(err);
    let bytes = serde_json::to_vec(&json).unwrap_or_default();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = to_http_status(&err.0);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    if let Some(id) = err
        .0
        .correlation_id
        .as_deref()
        .and_then(|id| HeaderValue::from_str(id).ok())
    {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID), id);
    }
    response
}

pub type HandlerFn = Arc<
    dyn for<'a> Fn(&'a mut InterceptContext, &'a mut dyn ProtoRequest) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync,
>;

/// Pins a closure to the higher-ranked handler signature.
pub fn handler_fn<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(&'a mut InterceptContext, &'a mut dyn ProtoRequest) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// A handler together with the descriptor and scopes it is registered under.
#[derive(Clone)]
pub struct GatewayRoute {
    pub method: Method,
    binding: RouteBinding,
    handler: HandlerFn,
}

impl GatewayRoute {
    pub fn new(
        method: Method,
        action: impl Into<String>,
        path_format: impl Into<String>,
        handler: HandlerFn,
    ) -> Self {
        Self {
            method,
            binding: RouteBinding::open(RouteDescriptor::new(action, path_format)),
            handler,
        }
    }

    pub fn secured(mut self, requirement: ScopeRequirement) -> Self {
        self.binding.requirement = Some(requirement);
        self
    }

    pub fn binding(&self) -> &RouteBinding {
        &self.binding
    }

    /// The declaration this route contributes to a [`crate::policy::RouteTable`].
    pub fn spec(&self) -> RouteSpec {
        RouteSpec {
            method: self.method.as_str().to_string(),
            action: self.binding.descriptor.action.clone(),
            path_format: self.binding.descriptor.path_format.clone(),
            scopes: self.binding.requirement.clone(),
        }
    }

    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    fn into_endpoint(
        self,
        chain: Arc<InterceptorChain>,
    ) -> impl Fn(Request<Body>) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static {
        let binding = Arc::new(self.binding);
        let handler = self.handler;
        move |req: Request<Body>| -> BoxFuture<'static, Response> {
            let chain = Arc::clone(&chain);
            let binding = Arc::clone(&binding);
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                handle_with_chain(req, &chain, &binding, move |cx, preq| handler(cx, preq)).await
            })
        }
    }
}

/// Registers `routes` on `router`, one axum method router per path format.
///
/// Path formats are handed to axum as is, so they must use the `:param`
/// syntax. A request whose path is declared but whose method is not goes to
/// `method_not_allowed` instead of axum's bare 405.
pub fn mount_routes<S, H, T>(
    mut router: Router<S>,
    routes: Vec<GatewayRoute>,
    chain: Arc<InterceptorChain>,
    method_not_allowed: H,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    H: Handler<T, S> + Clone,
    T: 'static,
{
    let mut by_path: BTreeMap<String, MethodRouter<S>> = BTreeMap::new();
    for route in routes {
        let filter = match MethodFilter::try_from(route.method.clone()) {
            Ok(filter) => filter,
            Err(_) => {
                warn!(method = %route.method, action = %route.binding.descriptor.action, "unsupported method, route skipped");
                continue;
            }
        };
        let path = route.binding.descriptor.path_format.clone();
        let methods = by_path.remove(&path).unwrap_or_else(MethodRouter::new);
        by_path.insert(path, methods.on(filter, route.into_endpoint(Arc::clone(&chain))));
    }
    for (path, methods) in by_path {
        router = router.route(&path, methods.fallback(method_not_allowed.clone()));
    }
    router
}
