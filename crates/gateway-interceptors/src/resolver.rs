use gateway_errors::prelude::codes;
use gateway_types::prelude::CallerContext;
use tracing::error;

use crate::context::InterceptContext;
use crate::errors::InterceptError;

/// Reads the caller context attached upstream.
pub struct ContextResolver;

impl ContextResolver {
    /// Fails with `CONTEXT.MISSING` when the slot is empty. This is a wiring
    /// defect upstream, not an authorization failure, and is logged as such.
    pub fn resolve(cx: &InterceptContext) -> Result<&CallerContext, InterceptError> {
        match cx.caller.as_ref() {
            Some(caller) => Ok(caller),
            None => {
                error!(
                    request_id = %cx.request_id,
                    action = cx.route.as_ref().map(|r| r.descriptor.action.as_str()).unwrap_or("-"),
                    code = %codes::CONTEXT_MISSING,
                    "caller context missing from request state"
                );
                Err(InterceptError::context_missing())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_types::prelude::CallerKind;

    #[test]
    fn resolves_attached_caller() {
        let cx = InterceptContext::default().with_caller(CallerContext::new(
            CallerKind::User,
            "user_1",
            ["projects:read"],
        ));
        let caller = ContextResolver::resolve(&cx).unwrap();
        assert_eq!(caller.caller_id.0, "user_1");
    }

    #[test]
    fn missing_caller_is_internal_not_client() {
        let err = ContextResolver::resolve(&InterceptContext::default()).unwrap_err();
        assert_eq!(err.code(), codes::CONTEXT_MISSING);
        assert_eq!(err.status(), 500);
        assert!(!err.is_client_error());
    }
}
