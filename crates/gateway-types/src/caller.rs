use crate::{id::Id, scope::ScopeRequirement, tenant::TenantId};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum CallerKind {
    User,
    Service,
}

/// Identity and granted scopes of the caller, attached upstream once per
/// request and read-only from then on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CallerContext {
    pub kind: CallerKind,
    pub caller_id: Id,
    #[serde(default)]
    pub tenant: TenantId,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl CallerContext {
    pub fn new<I, S>(kind: CallerKind, caller_id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            caller_id: Id(caller_id.into()),
            tenant: TenantId::default(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            claims: Default::default(),
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = TenantId(tenant.into());
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.permissions.contains(scope)
    }

    pub fn satisfies(&self, requirement: &ScopeRequirement) -> bool {
        requirement.is_satisfied_by(&self.permissions)
    }
}
