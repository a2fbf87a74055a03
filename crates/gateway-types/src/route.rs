#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Static identity of a registered endpoint, used for tracing and logs.
///
/// `path_format` is the route pattern (`/v1/projects/:project_id`), never the
/// resolved path with parameter values substituted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RouteDescriptor {
    pub action: String,
    pub path_format: String,
}

impl RouteDescriptor {
    pub fn new(action: impl Into<String>, path_format: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            path_format: path_format.into(),
        }
    }
}
