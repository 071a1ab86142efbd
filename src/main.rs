mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::{Compress, Logger}, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StoreBackend};
use crate::database::{MemoryStore, MongoDB, RecordStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("🚀 Starting Student Record Service...");
    log::info!("📦 Store backend: {}", config.backend);

    // Store handle: created once, shared by every worker
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::MongoDb => {
            let url = config.database_url.as_deref().unwrap_or_default();
            match MongoDB::new(url).await {
                Ok(db) => {
                    log::info!("✅ MongoDB connected successfully");
                    Arc::new(db)
                }
                Err(e) => {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string()));
                }
            }
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store: data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let store_data: web::Data<dyn RecordStore> = web::Data::from(store);

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
