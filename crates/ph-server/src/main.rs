//! ProjectHub server
//!
//! Serves the JSON API, the health checks and the uploaded files.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::{Parser, Subcommand};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ph_api::{ApiError, AppState};
use ph_attachments::{LocalStorage, Storage};
use ph_core::{config::AppConfig, PhError};
use ph_db::{Database, PoolConfig};
use ph_services::{seed_demo_data, ServiceContext};

mod health;

use health::{HealthChecker, HealthConfig};

#[derive(Parser)]
#[command(name = "projecthub-server", version, about = "ProjectHub API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (the default)
    Serve {
        /// Load the demo data set before serving
        #[arg(long)]
        seed: bool,
    },
    /// Write the demo data set to the configured store and exit
    Seed {
        /// Delete existing users, organizations, projects and tasks first
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        environment = ?config.environment,
        "Starting ProjectHub"
    );

    let db = connect(&config).await?;
    let ctx = ServiceContext::new(db.clone());

    match cli.command.unwrap_or(Command::Serve { seed: false }) {
        Command::Seed { reset } => {
            if db.backend() == "memory" {
                warn!("seeding the in-memory store; the data is gone when this process exits");
            }
            let summary = seed_demo_data(&ctx, reset).await?;
            info!(
                users = summary.users,
                projects = summary.projects,
                tasks = summary.tasks,
                "Seed complete"
            );
            Ok(())
        }
        Command::Serve { seed } => {
            if seed {
                seed_demo_data(&ctx, false).await?;
            }
            serve(config, db, ctx).await
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<Database> {
    match PoolConfig::from_settings(&config.database) {
        Some(pool) => {
            let db = Database::postgres(&pool).await?;
            info!("Connected to PostgreSQL");
            Ok(db)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
            Ok(Database::in_memory())
        }
    }
}

async fn serve(config: AppConfig, db: Database, ctx: ServiceContext) -> anyhow::Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(
        &config.storage.uploads_path,
        config.storage.uploads_url.clone(),
    ));
    let state = AppState::new(ctx, &config, storage);
    let health = Arc::new(HealthChecker::new(
        HealthConfig::default(),
        db,
        &config.storage.uploads_path,
    ));

    let app = build_router(state, health, &config);

    let addr = config.server_addr();
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Human readable output by default, JSON lines with `LOG_FORMAT=json`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,ph_server=debug,ph_api=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").map_or(false, |format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

fn build_router(state: AppState, health: Arc<HealthChecker>, config: &AppConfig) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(ph_api::router().with_state(state))
        .nest_service(
            &config.storage.uploads_url,
            ServeDir::new(&config.storage.uploads_path),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.server.max_body_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(config)),
        )
}

/// Credentials are allowed only for a configured client origin
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let Some(origin) = config.server.client_url.as_deref() else {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            warn!(origin, error = %e, "invalid CLIENT_URL, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    ApiError(PhError::not_found_with(
        "Route",
        &uri,
        format!("Not found - {}", uri.path()),
    ))
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never
/// fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
