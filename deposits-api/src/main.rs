use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod database;
mod error;
mod handlers;
mod helpers;
mod integrations;
mod jobs;

#[get("/health")]
async fn health(db: web::Data<Arc<database::Database>>) -> impl Responder {
    // Test database connection
    match db.connection.lock() {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("deposits-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Initialize database
    let db = helpers::database::initialize_database().expect("Failed to initialize database");

    tracing::info!(
        "Database initialized at: {:?}",
        helpers::database::get_db_path().unwrap()
    );

    // Load config
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Config loaded from: {:?}", config_path);

    let sync_manager = Arc::new(jobs::sync_manager::SyncManager::new(&config));

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type", "x-user-id"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type", "x-user-id"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(sync_manager.clone()))
            .service(health)
            .route("/api/auth/signup", web::post().to(handlers::auth::signup))
            .route("/api/auth/login", web::post().to(handlers::auth::login))
            .route("/api/me", web::get().to(handlers::auth::current_user))
            .route("/api/orgs", web::post().to(handlers::orgs::create_org))
            .route("/api/orgs", web::get().to(handlers::orgs::list_orgs))
            .route("/api/orgs/{id}", web::get().to(handlers::orgs::get_org))
            .route("/api/orgs/{id}", web::delete().to(handlers::orgs::delete_org))
            .route("/api/orgs/{id}/webhook", web::put().to(handlers::orgs::update_webhook))
            .route("/api/orgs/{id}/company-tag", web::put().to(handlers::orgs::update_company_tag))
            .route("/api/orgs/{id}/spreadsheet", web::put().to(handlers::orgs::update_spreadsheet))
            .route("/api/orgs/{id}/services", web::get().to(handlers::services::list_services))
            .route("/api/services", web::post().to(handlers::services::create_service))
            .route("/api/services/{id}", web::delete().to(handlers::services::delete_service))
            .route("/api/orgs/{id}/sources", web::get().to(handlers::sources::list_sources))
            .route("/api/sources", web::post().to(handlers::sources::create_source))
            .route("/api/sources/{id}", web::delete().to(handlers::sources::delete_source))
            .route("/api/leads", web::post().to(handlers::leads::create_lead))
            .route("/api/orgs/{id}/leads", web::get().to(handlers::leads::list_leads))
            .route("/api/leads/{id}", web::get().to(handlers::leads::get_lead))
            .route("/api/leads/{id}", web::put().to(handlers::leads::update_lead))
            .route("/api/leads/{id}/status", web::patch().to(handlers::leads::update_lead_status))
            .route("/api/leads/{id}", web::delete().to(handlers::leads::delete_lead))
            .route("/api/leads/{id}/sync/ghl", web::post().to(handlers::leads::sync_lead_to_ghl))
            .route("/api/orgs/{id}/metrics", web::get().to(handlers::metrics::get_metrics))
            .route("/api/orgs/{id}/leads/export", web::get().to(handlers::export::export_leads_csv))
    })
    .bind((host.as_str(), port))?
    .run();

    server.await
}
