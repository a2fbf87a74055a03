use futures::FutureExt;
use gateway_interceptors::prelude::*;
use gateway_observe::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

struct MockReq {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: serde_json::Value,
}

impl MockReq {
    fn get(path: &str) -> Self {
        Self {
            method: "GET".into(),
            path: path.into(),
            headers: HashMap::new(),
            body: json!({}),
        }
    }
}

#[derive(Default)]
struct MockRes {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<ResponseBody>,
}

impl MockRes {
    fn json(&self) -> serde_json::Value {
        match &self.body {
            Some(ResponseBody::Json(value)) => value.clone(),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }
}

#[async_trait::async_trait]
impl ProtoRequest for MockReq {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    async fn read_json(&mut self) -> Result<serde_json::Value, InterceptError> {
        Ok(self.body.clone())
    }
}

#[async_trait::async_trait]
impl ProtoResponse for MockRes {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    async fn write_body(&mut self, body: ResponseBody) -> Result<(), InterceptError> {
        self.body = Some(body);
        Ok(())
    }
}

fn unreachable_handler() -> HandlerResult {
    panic!("handler must not run")
}

fn secured(action: &str, path: &str, requirement: ScopeRequirement) -> RouteBinding {
    RouteBinding::secured(RouteDescriptor::new(action, path), requirement)
}

fn caller(scopes: &[&str]) -> CallerContext {
    CallerContext::new(CallerKind::User, "user_1", scopes.iter().copied())
}

fn traced_chain() -> (InterceptorChain, MemoryTraceSink) {
    let sink = MemoryTraceSink::new();
    let dispatcher = TraceDispatcher::spawn(Arc::new(sink.clone()), 64);
    (InterceptorChain::standard().with_tracer(dispatcher), sink)
}

async fn flush(chain: &InterceptorChain) {
    if let Some(tracer) = chain.tracer() {
        tracer.flush().await;
    }
}

#[tokio::test]
async fn missing_scope_is_denied_with_fixed_body() {
    let (chain, sink) = traced_chain();
    let cx = InterceptContext::default()
        .with_route(secured(
            "projects.delete",
            "/v1/projects/:project_id",
            require_scopes!("projects:write", "admin"),
        ))
        .with_caller(caller(&["projects:write"]));
    let mut req = MockReq::get("/v1/projects/p1");
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { unreachable_handler() }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 401);
    assert_eq!(res.json(), json!({"errors": ["Not enough permissions"]}));

    flush(&chain).await;
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, TraceOutcome::ClientError);
    assert_eq!(events[0].response.code.as_deref(), Some("AUTH.PERMISSION_DENIED"));
}

#[tokio::test]
async fn extra_scopes_reach_the_handler() {
    let (chain, sink) = traced_chain();
    let cx = InterceptContext::default()
        .with_route(secured("metrics.query", "/v1/m", require_scopes!("metrics:read")))
        .with_caller(caller(&["metrics:read", "projects:read", "admin"]));
    let mut req = MockReq::get("/v1/m");
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |cx, _req| {
            async move {
                let id = cx.caller.as_ref().map(|c| c.caller_id.0.clone());
                Ok(HandlerResponse::ok(json!({"data": {"caller": id}})))
            }
            .boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(res.json(), json!({"data": {"caller": "user_1"}}));
    assert!(res.headers.contains_key("X-Request-Id"));

    flush(&chain).await;
    assert_eq!(sink.events()[0].outcome, TraceOutcome::Passthrough);
}

#[tokio::test]
async fn empty_requirement_admits_caller_without_scopes() {
    let chain = InterceptorChain::standard();
    let cx = InterceptContext::default()
        .with_route(secured("ping", "/ping", require_scopes!()))
        .with_caller(caller(&[]));
    let mut req = MockReq::get("/ping");
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { Ok(HandlerResponse::ok(json!({"ok": true}))) }.boxed()
        })
        .await
        .unwrap();
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn missing_context_is_a_fault_not_a_denial() {
    let (chain, sink) = traced_chain();
    let cx = InterceptContext::default().with_route(secured(
        "projects.get",
        "/v1/projects/:project_id",
        require_scopes!("projects:read"),
    ));
    let mut req = MockReq::get("/v1/projects/p1");
    let mut res = MockRes::default();

    let err = chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { unreachable_handler() }.boxed()
        })
        .await
        .unwrap_err();

    assert_eq!(err.code().0, "CONTEXT.MISSING");
    assert_eq!(err.status(), 500);
    assert!(err.0.correlation_id.is_some());
    assert!(res.body.is_none());

    flush(&chain).await;
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, TraceOutcome::Fault);
}

#[tokio::test]
async fn open_route_never_resolves_context() {
    let chain = InterceptorChain::standard();
    let cx = InterceptContext::default()
        .with_route(RouteBinding::open(RouteDescriptor::new("health", "/health")));
    let mut req = MockReq::get("/health");
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { Ok(HandlerResponse::ok(json!({"status": "ok"}))) }.boxed()
        })
        .await
        .unwrap();
    assert_eq!(res.status, 200);
}

async fn run_open(chain: &InterceptorChain, response: HandlerResponse) -> MockRes {
    let cx = InterceptContext::default()
        .with_route(secured("projects.get", "/v1/projects/:project_id", require_scopes!()))
        .with_caller(caller(&[]));
    let mut req = MockReq::get("/v1/projects/p1");
    let mut res = MockRes::default();
    chain
        .run_with_handler(cx, &mut req, &mut res, move |_cx, _req| {
            async move { Ok(response) }.boxed()
        })
        .await
        .unwrap();
    res
}

#[tokio::test]
async fn in_band_errors_are_remapped() {
    let (chain, sink) = traced_chain();

    let res = run_open(&chain, HandlerResponse::ok(json!({"errors": ["project not found"]}))).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.json(), json!({"errors": ["project not found"]}));

    let res = run_open(
        &chain,
        HandlerResponse::ok(json!({"errors": ["invalid filter syntax"]})),
    )
    .await;
    assert_eq!(res.status, 400);

    flush(&chain).await;
    let outcomes: Vec<_> = sink.events().iter().map(|e| e.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            TraceOutcome::Remapped { from: 200 },
            TraceOutcome::Remapped { from: 200 }
        ]
    );
}

#[tokio::test]
async fn clean_and_non_200_bodies_pass_untouched() {
    let chain = InterceptorChain::standard();

    let res = run_open(&chain, HandlerResponse::ok(json!({"data": {"n": 1}}))).await;
    assert_eq!(res.status, 200);

    let res = run_open(&chain, HandlerResponse::ok(json!({"data": 1, "errors": null}))).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json(), json!({"data": 1, "errors": null}));

    let res = run_open(
        &chain,
        HandlerResponse::json(404, json!({"errors": ["x not found"]})),
    )
    .await;
    assert_eq!(res.status, 404);

    let res = run_open(&chain, HandlerResponse::json(201, json!({"errors": ["oops"]}))).await;
    assert_eq!(res.status, 201);
}

#[tokio::test]
async fn raised_client_error_becomes_envelope() {
    let chain = InterceptorChain::standard();
    let cx = InterceptContext::default()
        .with_route(secured("projects.delete", "/v1/projects/:id", require_scopes!()))
        .with_caller(caller(&[]));
    let mut req = MockReq::get("/v1/projects/p1");
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { Err(InterceptError::http(403, "forbidden resource")) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.status, 403);
    assert_eq!(res.json(), json!({"errors": ["forbidden resource"]}));
}

#[tokio::test]
async fn server_faults_propagate_unchanged() {
    let (chain, sink) = traced_chain();
    let cx = InterceptContext::default()
        .with_route(secured("projects.get", "/v1/projects/:id", require_scopes!()))
        .with_caller(caller(&[]));
    let mut req = MockReq::get("/v1/projects/p1");
    let mut res = MockRes::default();

    let err = chain
        .run_with_handler(cx, &mut req, &mut res, |_cx, _req| {
            async move { Err(InterceptError::http(503, "warehouse offline")) }.boxed()
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), 503);
    assert_eq!(err.0.message_user, "warehouse offline");
    assert!(res.body.is_none());

    flush(&chain).await;
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].response.status, 503);
    assert_eq!(events[0].outcome, TraceOutcome::Fault);
}

#[tokio::test]
async fn request_id_header_is_reused() {
    let chain = InterceptorChain::standard();
    let cx = InterceptContext::default()
        .with_route(RouteBinding::open(RouteDescriptor::new("health", "/health")));
    let mut req = MockReq::get("/health");
    req.headers.insert("X-Request-Id".into(), "req-42".into());
    let mut res = MockRes::default();

    chain
        .run_with_handler(cx, &mut req, &mut res, |cx, _req| {
            let id = cx.request_id.clone();
            async move { Ok(HandlerResponse::ok(json!({ "id": id }))) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(res.json(), json!({"id": "req-42"}));
    assert_eq!(res.headers.get("X-Request-Id").map(String::as_str), Some("req-42"));
}

#[tokio::test]
async fn route_bind_stage_matches_declared_routes() {
    let table = RouteTable::new(vec![RouteSpec {
        method: "GET".into(),
        action: "projects.get".into(),
        path_format: "/v1/projects/{project_id}".into(),
        scopes: Some(require_scopes!("projects:read")),
    }])
    .unwrap();
    let (sink, dispatcher) = {
        let sink = MemoryTraceSink::new();
        let dispatcher = TraceDispatcher::spawn(Arc::new(sink.clone()), 8);
        (sink, dispatcher)
    };
    let chain = InterceptorChain::new(vec![
        Box::new(ContextInitStage),
        Box::new(RouteBindStage {
            table: Arc::new(table),
        }),
        Box::new(PermissionGateStage),
    ])
    .with_tracer(dispatcher);

    let mut req = MockReq::get("/v1/projects/p7");
    let mut res = MockRes::default();
    let cx = InterceptContext::default().with_caller(caller(&["projects:read"]));
    chain
        .run_with_handler(cx, &mut req, &mut res, |cx, _req| {
            let id = cx.path_param("project_id").map(str::to_string);
            async move { Ok(HandlerResponse::ok(json!({ "data": { "id": id } }))) }.boxed()
        })
        .await
        .unwrap();
    assert_eq!(res.json(), json!({"data": {"id": "p7"}}));

    let mut req = MockReq::get("/v1/unknown");
    let mut res = MockRes::default();
    chain
        .run_with_handler(InterceptContext::default(), &mut req, &mut res, |_cx, _req| {
            async move { unreachable_handler() }.boxed()
        })
        .await
        .unwrap();
    assert_eq!(res.status, 404);
    assert_eq!(res.json(), json!({"errors": ["route not found"]}));

    flush(&chain).await;
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].path_format, "/v1/projects/{project_id}");
    assert_eq!(events[1].action, "unmatched");
}

#[test]
fn non_error_status_is_raised_as_internal() {
    for status in [200, 204, 302, 700] {
        let err = InterceptError::http(status, "odd");
        assert_eq!(err.status(), 500);
        assert_eq!(err.code().0, "UNKNOWN.INTERNAL");
        assert!(!err.is_client_error());
    }
    assert_eq!(InterceptError::http(405, "nope").code().0, "CLIENT.METHOD_NOT_ALLOWED");
}

#[test]
fn route_table_matches_paths_exactly_and_decodes_params() {
    let table = RouteTable::new(vec![RouteSpec {
        method: "GET".into(),
        action: "projects.get".into(),
        path_format: "/v1/projects/:project_id".into(),
        scopes: Some(require_scopes!("projects:read")),
    }])
    .unwrap();

    assert!(table.match_http("GET", "/v1/projects/p1/").is_none());
    let (route, params) = table.match_http("GET", "/v1/projects/my%20proj").unwrap();
    assert_eq!(route.action, "projects.get");
    assert_eq!(params["project_id"], "my proj");
}
