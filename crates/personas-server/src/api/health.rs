//! Liveness and metrics endpoints

use actix_web::{HttpResponse, get, web};
use serde_json::json;

use crate::model::AppState;

#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    match data.db().ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({"status": "UP"})),
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({"status": "DOWN"}))
        }
    }
}

#[get("/metrics")]
pub async fn prometheus_metrics(data: web::Data<AppState>) -> HttpResponse {
    match &data.prometheus {
        Some(handle) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(handle.render()),
        None => HttpResponse::NotFound().finish(),
    }
}
