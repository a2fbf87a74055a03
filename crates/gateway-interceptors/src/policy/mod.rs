pub mod model;
pub mod table;
pub mod template;

pub use gateway_types::prelude::ScopeRequirement;
pub use model::RouteSpec;
pub use table::RouteTable;

/// Declares a route's mandatory scopes.
///
/// ```
/// use gateway_interceptors::require_scopes;
/// let req = require_scopes!("projects:write", "admin");
/// assert_eq!(req.len(), 2);
/// assert!(require_scopes!().is_empty());
/// ```
#[macro_export]
macro_rules! require_scopes {
    () => {
        $crate::policy::ScopeRequirement::none()
    };
    ($($scope:expr),+ $(,)?) => {
        $crate::policy::ScopeRequirement::of([$($scope),+])
    };
}
