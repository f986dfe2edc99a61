use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::database::{DocumentStore, PORTALS_COLLECTION};
use crate::models::SyncResponse;
use crate::utils::AppError;

/// GET /api/portals - Lists every portal document
#[utoipa::path(
    get,
    path = "/api/portals",
    tag = "Portals",
    responses(
        (status = 200, description = "All portal documents", body = Vec<Object>),
        (status = 500, description = "Database failure")
    )
)]
pub async fn list_portals(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    super::list_collection(&**store, PORTALS_COLLECTION).await
}

/// POST /api/portals/sync - Upserts a batch of portals by their own `id`
#[utoipa::path(
    post,
    path = "/api/portals/sync",
    tag = "Portals",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "Batch synced", body = SyncResponse),
        (status = 400, description = "Body is not parseable JSON"),
        (status = 500, description = "Database failure, empty batch, or body that is not an array of objects")
    )
)]
pub async fn sync_portals(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    super::sync_collection(&**store, PORTALS_COLLECTION, body.into_inner()).await
}
