use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::DocumentStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
}

/// GET / - liveness string
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Job Tracker API is running!")
}

/// GET /health - liveness plus a ping to the database
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database did not answer the ping", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn DocumentStore>) -> impl Responder {
    let (status, mut response) = match store.ping().await {
        Ok(()) => ("healthy", HttpResponse::Ok()),
        Err(e) => {
            log::warn!("⚠️ Health check: database ping failed: {}", e);
            ("degraded", HttpResponse::ServiceUnavailable())
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
