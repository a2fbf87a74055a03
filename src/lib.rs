//! Analytics API gateway: caller-scope authorization, response normalization
//! and per-request tracing in front of the analytics handlers.

pub mod cli;
pub mod config;
pub mod routes;
pub mod server;

pub use config::GatewayConfig;
pub use server::{build_router, AppState};
