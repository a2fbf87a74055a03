pub use crate::dispatch::TraceDispatcher;
pub use crate::errors::ObserveError;
pub use crate::model::{RequestSummary, ResponseSummary, TraceEvent, TraceOutcome};
pub use crate::sink::{LogTraceSink, MemoryTraceSink, NoopTraceSink, TraceSink};
