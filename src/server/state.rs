use std::sync::Arc;

use gateway_interceptors::prelude::InterceptorChain;
use gateway_observe::prelude::{LogTraceSink, NoopTraceSink, TraceDispatcher, TraceSink};

use super::attach::CallerDirectory;
use crate::config::{GatewayConfig, TraceSinkKind};
use crate::routes::ProjectCatalog;

/// Shared, cheaply clonable service state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ProjectCatalog>,
    pub callers: Arc<CallerDirectory>,
    tracer: Option<TraceDispatcher>,
}

impl AppState {
    /// Builds the state and starts the trace worker on the current runtime.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let sink: Arc<dyn TraceSink> = match config.trace.sink {
            TraceSinkKind::Log => Arc::new(LogTraceSink),
            TraceSinkKind::Noop => Arc::new(NoopTraceSink),
        };
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: &GatewayConfig, sink: Arc<dyn TraceSink>) -> Self {
        let tracer = config
            .trace
            .enabled
            .then(|| TraceDispatcher::spawn(sink, config.trace.queue_capacity));
        Self {
            catalog: Arc::new(ProjectCatalog::from_records(config.projects.clone())),
            callers: Arc::new(CallerDirectory::from_entries(&config.callers)),
            tracer,
        }
    }

    pub fn tracer(&self) -> Option<&TraceDispatcher> {
        self.tracer.as_ref()
    }

    /// A chain with the given stages, wired to this state's tracer.
    pub fn chain(&self, chain: InterceptorChain) -> InterceptorChain {
        match &self.tracer {
            Some(tracer) => chain.with_tracer(tracer.clone()),
            None => chain,
        }
    }
}
