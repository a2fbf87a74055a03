use std::sync::Arc;

use crate::context::{InterceptContext, ProtoRequest};
use crate::errors::InterceptError;
use crate::policy::RouteTable;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use tracing::debug;

/// Binds the request to a declared route when the transport has not already
/// done so.
pub struct RouteBindStage {
    pub table: Arc<RouteTable>,
}

#[async_trait]
impl Stage for RouteBindStage {
    async fn handle(
        &self,
        cx: &mut InterceptContext,
        req: &mut dyn ProtoRequest,
    ) -> Result<StageOutcome, InterceptError> {
        if cx.route.is_some() {
            return Ok(StageOutcome::Continue);
        }

        let Some((spec, params)) = self.table.match_http(req.method(), req.path()) else {
            debug!(method = req.method(), path = req.path(), "no route declared");
            return Err(InterceptError::not_found("route not found"));
        };

        cx.route = Some(spec.binding());
        cx.path_params = params;
        Ok(StageOutcome::Continue)
    }
}
