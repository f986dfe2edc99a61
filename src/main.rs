mod api;
mod config;
mod database;
mod middleware;
mod models;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::database::DocumentStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = config::AppConfig::from_env().map_err(std::io::Error::other)?;

    log::info!("🚀 Starting Job Tracker API...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Invalid MongoDB configuration: {}", e);
            std::io::Error::other(e)
        })?;

    let store: web::Data<dyn DocumentStore> =
        web::Data::from(Arc::new(db.clone()) as Arc<dyn DocumentStore>);

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    // Start HTTP server; SIGINT/SIGTERM stop it gracefully
    let served = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind(bind_address.as_str())?
    .run()
    .await;

    db.shutdown().await;
    log::info!("MongoDB connection closed");

    served
}
