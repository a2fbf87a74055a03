use crate::context::{InterceptContext, ProtoRequest};
use crate::errors::InterceptError;
use crate::resolver::ContextResolver;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use gateway_types::prelude::{CallerContext, ScopeRequirement};
use tracing::debug;

/// Checks a caller's granted scopes against a route's requirement.
///
/// Every listed scope must be present; extra scopes are fine. Denials carry a
/// fixed 401 body that never names the missing scopes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionGate {
    requirement: ScopeRequirement,
}

impl PermissionGate {
    pub fn new(requirement: ScopeRequirement) -> Self {
        Self { requirement }
    }

    pub fn of<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ScopeRequirement::of(scopes))
    }

    pub fn requirement(&self) -> &ScopeRequirement {
        &self.requirement
    }

    pub fn check(&self, caller: &CallerContext) -> Result<(), InterceptError> {
        if caller.satisfies(&self.requirement) {
            return Ok(());
        }
        debug!(
            caller = %caller.caller_id.as_str(),
            missing = ?self.requirement.missing_from(&caller.permissions),
            "permission denied"
        );
        Err(InterceptError::permission_denied())
    }
}

/// Applies the bound route's requirement. Routes bound without a requirement
/// skip the gate and never touch the caller slot.
pub struct PermissionGateStage;

#[async_trait]
impl Stage for PermissionGateStage {
    async fn handle(
        &self,
        cx: &mut InterceptContext,
        _req: &mut dyn ProtoRequest,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(requirement) = cx.route.as_ref().and_then(|r| r.requirement.clone()) else {
            return Ok(StageOutcome::Continue);
        };
        let caller = ContextResolver::resolve(cx)?;
        PermissionGate::new(requirement).check(caller)?;
        Ok(StageOutcome::Continue)
    }
}
