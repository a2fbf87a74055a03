use std::collections::BTreeMap;

use gateway_types::prelude::Validate;

use super::model::RouteSpec;
use super::template::match_template;
use crate::errors::InterceptError;

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
}

impl RouteTable {
    /// Rejects routes with an invalid descriptor or malformed scopes.
    pub fn new(routes: Vec<RouteSpec>) -> Result<Self, InterceptError> {
        for route in &routes {
            route
                .descriptor()
                .validate()
                .map_err(|e| InterceptError::internal(&format!("route {}: {e}", route.action)))?;
            if let Some(scopes) = &route.scopes {
                scopes.validate().map_err(|e| {
                    InterceptError::internal(&format!("route {}: {e}", route.action))
                })?;
            }
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    /// First declared route whose method and template match.
    pub fn match_http(
        &self,
        method: &str,
        path: &str,
    ) -> Option<(&RouteSpec, BTreeMap<String, String>)> {
        self.routes.iter().find_map(|route| {
            if !route.method.eq_ignore_ascii_case(method) {
                return None;
            }
            match_template(&route.path_format, path).map(|params| (route, params))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::require_scopes;

    fn spec(method: &str, action: &str, path: &str) -> RouteSpec {
        RouteSpec {
            method: method.into(),
            action: action.into(),
            path_format: path.into(),
            scopes: Some(require_scopes!("projects:read")),
        }
    }

    #[test]
    fn matches_method_and_template() {
        let table = RouteTable::new(vec![
            spec("GET", "projects.get", "/v1/projects/:project_id"),
            spec("DELETE", "projects.delete", "/v1/projects/:project_id"),
        ])
        .unwrap();
        let (route, params) = table.match_http("delete", "/v1/projects/p1").unwrap();
        assert_eq!(route.action, "projects.delete");
        assert_eq!(params.get("project_id").map(String::as_str), Some("p1"));
        assert!(table.match_http("POST", "/v1/projects/p1").is_none());
    }

    #[test]
    fn rejects_relative_path_format() {
        assert!(RouteTable::new(vec![spec("GET", "x", "v1/x")]).is_err());
    }

    #[test]
    fn rejects_blank_scope() {
        let mut bad = spec("GET", "x", "/x");
        bad.scopes = Some(require_scopes!("ok", " "));
        assert!(RouteTable::new(vec![bad]).is_err());
    }
}
