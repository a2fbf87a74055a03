pub use crate::context::{InterceptContext, ProtoRequest, ProtoResponse, RouteBinding};
pub use crate::errors::InterceptError;
pub use crate::policy::{RouteSpec, RouteTable, ScopeRequirement};
pub use crate::require_scopes;
pub use crate::resolver::ContextResolver;
pub use crate::response::{HandlerResponse, HandlerResult, ResponseBody};
pub use crate::stages::context_init::ContextInitStage;
pub use crate::stages::permission_gate::{PermissionGate, PermissionGateStage};
pub use crate::stages::response_norm::{
    Disposition, NormalizedResponse, ResponseNormalizer, NOT_FOUND_MARKER,
};
pub use crate::stages::route_bind::RouteBindStage;
pub use crate::stages::{InterceptorChain, Stage, StageOutcome};
pub use gateway_types::prelude::{CallerContext, CallerKind, RouteDescriptor};
