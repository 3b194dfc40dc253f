//! SafeStage API Server - fire-safety calculations for Swiss event venues
//!
//! Provides REST endpoints for:
//! - Canton and calculation type reference data
//! - Parameter resolution and formula evaluation
//! - Full-table sync for offline clients
//! - Administrative parameter edits

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod models;
mod state;

use state::AppState;

/// Command-line arguments for the SafeStage API
#[derive(Parser, Debug)]
#[command(name = "safestage-api")]
#[command(about = "SafeStage fire-safety calculation API")]
struct Args {
    /// Host address to bind to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "API_PORT", default_value = "3000")]
    port: u16,

    /// SQLx connection string; defaults to a file in the platform data directory
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Do not load the canton and calculation catalog on start-up
    #[arg(long)]
    skip_seed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web and mobile clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/v1/health", get(handlers::health))
        // Reference data
        .route("/v1/cantons", get(handlers::list_cantons))
        .route("/v1/cantons/:code", get(handlers::get_canton))
        // Calculations
        .route(
            "/v1/calculations/types",
            get(handlers::list_calculation_types),
        )
        .route("/v1/calculations/parameters", get(handlers::get_parameters))
        .route("/v1/calculations/compute", post(handlers::compute))
        // Offline sync
        .route("/v1/sync/versions", get(handlers::sync_versions))
        .route("/v1/sync/data", get(handlers::sync_data))
        // Administration
        .route(
            "/admin/api/calculation-parameters",
            put(handlers::upsert_parameter),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("safestage_api=info,tower_http=debug"));
    let filter = if args.verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        filter
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing SafeStage API...");
    let database_url = args
        .database_url
        .clone()
        .unwrap_or_else(state::default_database_url);
    let state = AppState::connect(&database_url).await?;

    if args.skip_seed {
        info!("Skipping seed");
    } else {
        state.seed().await?;
    }

    let app = router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting SafeStage API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
