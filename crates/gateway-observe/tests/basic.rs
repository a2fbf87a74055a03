use std::sync::Arc;

use async_trait::async_trait;
use gateway_observe::prelude::*;
use tokio::sync::Notify;

fn event(action: &str, status: u16) -> TraceEvent {
    TraceEvent {
        ts_ms: 1_726_000_000_000,
        action: action.to_string(),
        path_format: "/v1/projects/:project_id".to_string(),
        request: RequestSummary {
            request_id: "req-1".into(),
            method: "GET".into(),
            path: "/v1/projects/42".into(),
            caller_id: Some("user_1".into()),
            tenant: Some("tenantA".into()),
            trace_id: None,
        },
        response: ResponseSummary {
            status,
            body: Some(serde_json::json!({"data": {}})),
            code: None,
        },
        outcome: TraceOutcome::Passthrough,
        elapsed_ms: 3,
    }
}

struct FailingSink;

#[async_trait]
impl TraceSink for FailingSink {
    async fn record(&self, _event: TraceEvent) -> Result<(), ObserveError> {
        Err(ObserveError::unavailable("collector offline"))
    }
}

struct GatedSink {
    entered: Arc<Notify>,
    release: Arc<Notify>,
    inner: MemoryTraceSink,
}

#[async_trait]
impl TraceSink for GatedSink {
    async fn record(&self, event: TraceEvent) -> Result<(), ObserveError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.record(event).await
    }
}

#[tokio::test]
async fn dispatcher_delivers_in_order_after_flush() {
    let sink = MemoryTraceSink::new();
    let dispatcher = TraceDispatcher::spawn(Arc::new(sink.clone()), 16);

    dispatcher.emit(event("get_project", 200));
    dispatcher.emit(event("query_metrics", 400));
    dispatcher.flush().await;

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "get_project");
    assert_eq!(events[1].response.status, 400);
    assert_eq!(dispatcher.dropped(), 0);
}

#[tokio::test]
async fn failing_sink_does_not_stop_the_worker() {
    let dispatcher = TraceDispatcher::spawn(Arc::new(FailingSink), 4);
    dispatcher.emit(event("get_project", 200));
    dispatcher.emit(event("get_project", 404));
    dispatcher.flush().await;
    assert_eq!(dispatcher.dropped(), 0);
}

#[tokio::test]
async fn full_queue_drops_instead_of_blocking() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let inner = MemoryTraceSink::new();
    let sink = GatedSink {
        entered: entered.clone(),
        release: release.clone(),
        inner: inner.clone(),
    };
    let dispatcher = TraceDispatcher::spawn(Arc::new(sink), 1);

    dispatcher.emit(event("first", 200));
    entered.notified().await;

    dispatcher.emit(event("second", 200));
    dispatcher.emit(event("third", 200));
    assert_eq!(dispatcher.dropped(), 1);

    release.notify_one();
    entered.notified().await;
    release.notify_one();
    dispatcher.flush().await;

    let actions: Vec<_> = inner.events().into_iter().map(|e| e.action).collect();
    assert_eq!(actions, vec!["first", "second"]);
}

#[test]
fn outcome_serializes_with_kind_tag() {
    let value = serde_json::to_value(TraceOutcome::Remapped { from: 200 }).unwrap();
    assert_eq!(value, serde_json::json!({"kind": "remapped", "from": 200}));
}
