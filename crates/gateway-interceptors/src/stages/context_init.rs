use crate::context::{InterceptContext, ProtoRequest};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome, REQUEST_ID_HEADER};
use async_trait::async_trait;
use gateway_types::prelude::{Id, TraceContext};

const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Assigns the request id and picks up the upstream trace id.
pub struct ContextInitStage;

#[async_trait]
impl Stage for ContextInitStage {
    async fn handle(
        &self,
        cx: &mut InterceptContext,
        req: &mut dyn ProtoRequest,
    ) -> Result<StageOutcome, InterceptError> {
        cx.request_id = req
            .header(REQUEST_ID_HEADER)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Id::new_random().0);

        cx.trace = TraceContext::from_trace_id(req.header(TRACE_ID_HEADER));

        Ok(StageOutcome::Continue)
    }
}
