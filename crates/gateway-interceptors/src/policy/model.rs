use gateway_types::prelude::{RouteDescriptor, ScopeRequirement};
use serde::{Deserialize, Serialize};

use crate::context::RouteBinding;

/// A declared route. `scopes: None` marks an open route; `Some([])` still
/// requires an attached caller context.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteSpec {
    pub method: String,
    pub action: String,
    pub path_format: String,
    #[serde(default)]
    pub scopes: Option<ScopeRequirement>,
}

impl RouteSpec {
    pub fn descriptor(&self) -> RouteDescriptor {
        RouteDescriptor::new(self.action.clone(), self.path_format.clone())
    }

    pub fn binding(&self) -> RouteBinding {
        RouteBinding {
            descriptor: self.descriptor(),
            requirement: self.scopes.clone(),
        }
    }
}
