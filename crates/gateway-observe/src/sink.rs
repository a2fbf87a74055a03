use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::model::TraceEvent;
use crate::ObserveError;

/// Destination for completed-request trace records.
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record(&self, event: TraceEvent) -> Result<(), ObserveError>;
}

#[derive(Clone, Default)]
pub struct NoopTraceSink;

#[async_trait]
impl TraceSink for NoopTraceSink {
    async fn record(&self, _event: TraceEvent) -> Result<(), ObserveError> {
        Ok(())
    }
}

/// Writes each trace as a structured `tracing` event on the `gateway::trace` target.
#[derive(Clone, Default)]
pub struct LogTraceSink;

#[async_trait]
impl TraceSink for LogTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), ObserveError> {
        let request = serde_json::to_string(&event.request)
            .map_err(|err| ObserveError::internal(&format!("encode request: {err}")))?;
        tracing::info!(
            target: "gateway::trace",
            action = %event.action,
            path_format = %event.path_format,
            status = event.response.status,
            outcome = event.outcome.as_str(),
            code = event.response.code.as_deref().unwrap_or("-"),
            elapsed_ms = event.elapsed_ms,
            request = %request,
            "request traced"
        );
        Ok(())
    }
}

/// Keeps every event in memory. Meant for tests and local inspection.
#[derive(Clone, Default)]
pub struct MemoryTraceSink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl MemoryTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl TraceSink for MemoryTraceSink {
    async fn record(&self, event: TraceEvent) -> Result<(), ObserveError> {
        self.events.lock().push(event);
        Ok(())
    }
}
