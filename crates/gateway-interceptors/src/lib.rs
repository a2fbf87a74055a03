pub mod adapters;
pub mod context;
pub mod errors;
pub mod observe;
pub mod policy;
pub mod prelude;
pub mod resolver;
pub mod response;
pub mod stages;

pub use stages::{InterceptorChain, Stage, StageOutcome};
