//! HTTP API module
//!
//! - `persona` - Persona CRUD, search, statistics, populate and reset handlers
//! - `health` - Liveness and Prometheus endpoints
//! - `model` - Request and response bodies
//! - `route` - Route table under `/personas`

pub mod health;
pub mod model;
pub mod persona;
pub mod route;

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};

/// Registers extractor error handlers and every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(route::routes())
        .service(health::health)
        .service(health::prometheus_metrics);
}
