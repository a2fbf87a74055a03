mod catalog;
mod filter;
mod health;
mod projects;

pub use catalog::{ProjectCatalog, Removal};
pub use filter::{parse_filter, FilterClause, FilterError, FilterOp};

use gateway_interceptors::adapters::http::GatewayRoute;

use crate::server::AppState;

/// Every route the gateway serves, with its descriptor and scope requirement.
pub fn gateway_routes(state: &AppState) -> Vec<GatewayRoute> {
    vec![
        health::route(state.tracer().cloned()),
        projects::get_route(state.catalog.clone()),
        projects::metrics_route(state.catalog.clone()),
        projects::delete_route(state.catalog.clone()),
    ]
}
