pub mod health;
pub mod jobs;
pub mod metrics;
pub mod portals;
pub mod swagger;

use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::database::DocumentStore;
use crate::models::{document, SyncResponse};
use crate::utils::AppError;

/// Registers every route. Expects a `web::Data<dyn DocumentStore>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(health::index))
    .route("/health", web::get().to(health::health_check))
    .route("/metrics", web::get().to(metrics::get_metrics))
    .service(
        web::scope("/api/jobs")
            .route("", web::get().to(jobs::list_jobs))
            .route("", web::post().to(jobs::create_job))
            .route("/sync", web::post().to(jobs::sync_jobs))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}", web::delete().to(jobs::delete_job)),
    )
    .service(
        web::scope("/api/portals")
            .route("", web::get().to(portals::list_portals))
            .route("/sync", web::post().to(portals::sync_portals)),
    );
}

async fn list_collection(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<HttpResponse, AppError> {
    let docs = store.find_all(collection).await?;

    log::info!("📋 GET {} - {} documents", collection, docs.len());
    let body: Vec<Value> = docs.into_iter().map(document::to_json).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn sync_collection(
    store: &dyn DocumentStore,
    collection: &str,
    body: Value,
) -> Result<HttpResponse, AppError> {
    let docs = document::batch_from_json(body)?;
    let batch_size = docs.len();

    let result = store.bulk_upsert(collection, docs).await?;
    metrics::add_synced_documents(result.synced_count());

    let response = SyncResponse::new(collection, result);
    log::info!("🔄 SYNC {} - {} (batch of {})", collection, response.message, batch_size);
    Ok(HttpResponse::Ok().json(response))
}
