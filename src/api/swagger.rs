use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Tracker API",
        version = "1.0.0",
        description = "CRUD and bulk-sync endpoints over the `jobs` and `portals` collections.\n\nDocuments are schemaless JSON objects keyed by their own `id` field. Any database failure is returned as HTTP 500 with `{\"error\": \"<message>\"}`."
    ),
    paths(
        // Health & Metrics
        crate::api::health::index,
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Jobs
        crate::api::jobs::list_jobs,
        crate::api::jobs::create_job,
        crate::api::jobs::update_job,
        crate::api::jobs::sync_jobs,
        crate::api::jobs::delete_job,

        // Portals
        crate::api::portals::list_portals,
        crate::api::portals::sync_portals,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::InsertResult,
            crate::models::UpsertResult,
            crate::models::DeleteResult,
            crate::models::BulkWriteResult,
            crate::models::SyncResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness, health check and request metrics."),
        (name = "Jobs", description = "Tracked job applications. Upserts match on the application-level `id`."),
        (name = "Portals", description = "Job portals/sources. Synced in bulk, matched on `id`."),
    )
)]
pub struct ApiDoc;
