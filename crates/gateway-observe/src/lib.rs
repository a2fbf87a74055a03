pub mod dispatch;
pub mod errors;
pub mod model;
pub mod prelude;
pub mod sink;

pub use dispatch::TraceDispatcher;
pub use errors::ObserveError;
pub use model::{RequestSummary, ResponseSummary, TraceEvent, TraceOutcome};
