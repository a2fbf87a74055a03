pub use crate::{
    caller::{CallerContext, CallerKind},
    id::Id,
    route::RouteDescriptor,
    scope::ScopeRequirement,
    tenant::TenantId,
    trace::TraceContext,
    validate::{Validate, ValidateError},
};
