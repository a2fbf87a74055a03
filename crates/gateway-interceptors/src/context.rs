use async_trait::async_trait;
use gateway_types::prelude::*;
use http::Extensions;
use std::collections::BTreeMap;

use crate::response::ResponseBody;

/// Request-scoped state threaded through the stages and the handler.
#[derive(Clone, Debug, Default)]
pub struct InterceptContext {
    pub request_id: String,
    pub trace: TraceContext,
    pub route: Option<RouteBinding>,
    /// Slot filled by the upstream context attachment. Read through
    /// [`crate::resolver::ContextResolver`], never written by the chain.
    pub caller: Option<CallerContext>,
    pub path_params: BTreeMap<String, String>,
    pub extensions: Extensions,
}

impl InterceptContext {
    pub fn with_caller(mut self, caller: CallerContext) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_route(mut self, route: RouteBinding) -> Self {
        self.route = Some(route);
        self
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }
}

/// A route as registered: descriptor plus optional scope requirement.
/// `requirement: None` skips the permission gate entirely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteBinding {
    pub descriptor: RouteDescriptor,
    pub requirement: Option<ScopeRequirement>,
}

impl RouteBinding {
    pub fn open(descriptor: RouteDescriptor) -> Self {
        Self {
            descriptor,
            requirement: None,
        }
    }

    pub fn secured(descriptor: RouteDescriptor, requirement: ScopeRequirement) -> Self {
        Self {
            descriptor,
            requirement: Some(requirement),
        }
    }
}

#[async_trait]
pub trait ProtoRequest: Send {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn header(&self, name: &str) -> Option<String>;
    async fn read_json(&mut self) -> Result<serde_json::Value, crate::errors::InterceptError>;
}

#[async_trait]
pub trait ProtoResponse: Send {
    fn set_status(&mut self, code: u16);
    fn insert_header(&mut self, name: &str, value: &str);
    async fn write_body(&mut self, body: ResponseBody)
        -> Result<(), crate::errors::InterceptError>;
}
