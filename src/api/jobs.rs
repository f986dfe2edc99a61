use actix_web::{web, HttpResponse};
use mongodb::bson::Bson;
use serde_json::Value;

use crate::database::{DocumentStore, JOBS_COLLECTION};
use crate::models::{document, DeleteResult, InsertResult, SyncResponse, UpsertResult};
use crate::utils::AppError;

/// GET /api/jobs - Lists every job document
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    responses(
        (status = 200, description = "All job documents", body = Vec<Object>),
        (status = 500, description = "Database failure")
    )
)]
pub async fn list_jobs(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    super::list_collection(&**store, JOBS_COLLECTION).await
}

/// POST /api/jobs - Inserts the body as a new job
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = Object,
    responses(
        (status = 201, description = "Job inserted", body = InsertResult),
        (status = 500, description = "Database failure")
    )
)]
pub async fn create_job(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let doc = document::from_json(body.into_inner())?;
    let result = store.insert_one(JOBS_COLLECTION, doc).await?;

    log::info!("➕ POST /api/jobs - inserted {}", result.inserted_id);
    Ok(HttpResponse::Created().json(result))
}

/// PUT /api/jobs/{id} - Sets the given fields on the job with this `id`,
/// creating it when absent
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = String, Path, description = "Application-level job id")),
    request_body = Object,
    responses(
        (status = 200, description = "Job upserted", body = UpsertResult),
        (status = 500, description = "Database failure")
    )
)]
pub async fn update_job(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let fields = document::set_fields(document::from_json(body.into_inner())?);

    let result = store
        .upsert_by_id(JOBS_COLLECTION, Bson::String(id.clone()), fields)
        .await?;

    log::info!(
        "🔧 PUT /api/jobs/{} - matched {}, modified {}, upserted {}",
        id,
        result.matched_count,
        result.modified_count,
        result.upserted_count
    );
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/jobs/sync - Upserts a batch of jobs by their own `id`
#[utoipa::path(
    post,
    path = "/api/jobs/sync",
    tag = "Jobs",
    request_body = Vec<Object>,
    responses(
        (status = 200, description = "Batch synced", body = SyncResponse),
        (status = 400, description = "Body is not parseable JSON"),
        (status = 500, description = "Database failure, empty batch, or body that is not an array of objects")
    )
)]
pub async fn sync_jobs(
    store: web::Data<dyn DocumentStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    super::sync_collection(&**store, JOBS_COLLECTION, body.into_inner()).await
}

/// DELETE /api/jobs/{id} - Removes the job with this `id`, if any
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = String, Path, description = "Application-level job id")),
    responses(
        (status = 200, description = "Delete outcome; deletedCount is 0 when nothing matched", body = DeleteResult),
        (status = 500, description = "Database failure")
    )
)]
pub async fn delete_job(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = store.delete_by_id(JOBS_COLLECTION, &id).await?;

    log::info!("🗑️ DELETE /api/jobs/{} - deleted {}", id, result.deleted_count);
    Ok(HttpResponse::Ok().json(result))
}
