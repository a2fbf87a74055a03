use std::time::Instant;

use crate::context::{InterceptContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::observe::trace_event;
use crate::response::{HandlerResponse, HandlerResult};
use crate::stages::response_norm::ResponseNormalizer;
use async_trait::async_trait;
use futures::future::BoxFuture;
use gateway_errors::prelude::labels;
use gateway_observe::TraceDispatcher;
use tracing::{error, warn};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(
        &self,
        cx: &mut InterceptContext,
        req: &mut dyn ProtoRequest,
    ) -> Result<StageOutcome, InterceptError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum StageOutcome {
    Continue,
    /// Skip the handler; the response still goes through normalization.
    ShortCircuit(HandlerResponse),
}

pub struct InterceptorChain {
    stages: Vec<Box<dyn Stage>>,
    normalizer: ResponseNormalizer,
    tracer: Option<TraceDispatcher>,
}

impl InterceptorChain {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            normalizer: ResponseNormalizer,
            tracer: None,
        }
    }

    /// Context init followed by the permission gate.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(context_init::ContextInitStage),
            Box::new(permission_gate::PermissionGateStage),
        ])
    }

    pub fn with_tracer(mut self, tracer: TraceDispatcher) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn tracer(&self) -> Option<&TraceDispatcher> {
        self.tracer.as_ref()
    }

    pub async fn run_with_handler<F>(
        &self,
        mut cx: InterceptContext,
        req: &mut dyn ProtoRequest,
        rsp: &mut dyn ProtoResponse,
        handler: F,
    ) -> Result<(), InterceptError>
    where
        F: for<'a> FnOnce(
                &'a mut InterceptContext,
                &'a mut dyn ProtoRequest,
            ) -> BoxFuture<'a, HandlerResult>
            + Send,
    {
        let started = Instant::now();
        let result = self.dispatch(&mut cx, req, handler).await;
        let normalized = self
            .normalizer
            .normalize(result)
            .map_err(|err| err.annotate(&cx));

        if let Some(tracer) = &self.tracer {
            tracer.emit(trace_event(&cx, req, &normalized, started.elapsed()));
        }

        match normalized {
            Ok(normalized) => {
                let response = normalized.response;
                rsp.set_status(response.status);
                for (name, value) in &response.headers {
                    rsp.insert_header(name, value);
                }
                if !cx.request_id.is_empty() {
                    rsp.insert_header(REQUEST_ID_HEADER, &cx.request_id);
                }
                rsp.write_body(response.body).await
            }
            Err(err) => {
                let obj = &err.0;
                let labels = labels(obj);
                if obj.severity.is_alerting() {
                    error!(
                        request_id = %cx.request_id,
                        ?labels,
                        dev = obj.message_dev.as_deref().unwrap_or("-"),
                        "request failed"
                    );
                } else {
                    warn!(request_id = %cx.request_id, ?labels, "request failed");
                }
                Err(err)
            }
        }
    }

    async fn dispatch<F>(
        &self,
        cx: &mut InterceptContext,
        req: &mut dyn ProtoRequest,
        handler: F,
    ) -> HandlerResult
    where
        F: for<'a> FnOnce(
                &'a mut InterceptContext,
                &'a mut dyn ProtoRequest,
            ) -> BoxFuture<'a, HandlerResult>
            + Send,
    {
        for stage in &self.stages {
            match stage.handle(cx, req).await? {
                StageOutcome::Continue => {}
                StageOutcome::ShortCircuit(response) => return Ok(response),
            }
        }
        handler(cx, req).await
    }
}

pub mod context_init;
pub mod permission_gate;
pub mod response_norm;
pub mod route_bind;
