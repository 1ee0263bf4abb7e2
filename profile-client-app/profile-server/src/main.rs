use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use profile_api::AppState;
use profile_core::ports::PhotoStore;
use profile_core::repositories::{InMemoryMemberRepository, MemberRepository};
use profile_infrastructure::database::{create_pool, run_migrations};
use profile_infrastructure::{CloudinaryPhotoStore, PgMemberRepository};
use profile_security::JwtService;
use profile_shared::config::{AppConfig, StorageBackend};
use profile_shared::constants::PAGINATION_HEADER;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry; the guard flushes file logs on shutdown
    let _log_guard = profile_shared::telemetry::init_telemetry(&config.logging)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    let member_repo: Arc<dyn MemberRepository> = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&config.database).await.map_err(|e| {
                error!("Database connection failed: {}", e);
                e
            })?;
            run_migrations(&pool).await?;
            info!("Database connection established.");
            Arc::new(PgMemberRepository::new(pool))
        }
        StorageBackend::Memory => {
            info!("Using in-memory member store");
            Arc::new(InMemoryMemberRepository::new())
        }
    };

    let photo_store: Arc<dyn PhotoStore> = Arc::new(CloudinaryPhotoStore::new(config.photo_storage.clone()));
    let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    let state = AppState::new(member_repo, photo_store, jwt, config.pagination.limits());

    let cors = CorsLayer::new()
        .allow_origin(config.app.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(PAGINATION_HEADER), header::LOCATION]);

    let app = profile_api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new());

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
