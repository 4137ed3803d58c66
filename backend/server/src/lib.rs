//! Backend for an amphibian species encyclopedia.
//!
//! # General Infrastructure
//! - Species data lives in a hosted Postgres exposed over PostgREST, see [`database`]
//! - This server is the only client holding the service key
//! - Every endpoint is a read: query the data source, reshape, return JSON
//!
//!
//!
//! # Endpoints
//!
//! | Route | Response |
//! |---|---|
//! | `GET /health` | `OK` |
//! | `GET /api/species?q=&familia=` | flat species list |
//! | `POST /api/species/filter` | flat species list matching a [`taxa::SpeciesFilter`] body |
//! | `GET /api/species/tree?q=&familia=&sort=alpha` | Order > Family > Genus tree with summaries |
//! | `GET /api/species/orders?q=&familia=` | species grouped by order only |
//! | `GET /api/search-taxon?q=` | up to 10 `{id_taxon, taxon}` matches |
//!
//! The tree and the order cards are separate read paths over the same flat list. Neither is derived from
//! the other.
//!
//!
//!
//! # Setup
//!
//! Environment variables, all optional:
//! - `RUST_PORT` (1111)
//! - `SUPABASE_URL` (http://localhost:54321)
//! - `REQUEST_TIMEOUT_MS` (10000)
//! - `SECRETS_DIR` (/run/secrets)
//!
//! The service key is read from `$SECRETS_DIR/SUPABASE_SERVICE_KEY`, falling back to the
//! `SUPABASE_SERVICE_KEY` environment variable.
//!
//! Run with logs.
//! ```sh
//! RUST_LOG=info,tower_http=debug cargo run -p sapopedia
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    filter_handler, health_handler, orders_handler, search_taxon_handler, species_handler,
    tree_handler,
};
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load().context("Environment misconfigured")?;

    info!("Initializing state...");
    let state = AppState::new(config).context("Failed to build data source client")?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/species", get(species_handler))
        .route("/api/species/filter", post(filter_handler))
        .route("/api/species/tree", get(tree_handler))
        .route("/api/species/orders", get(orders_handler))
        .route("/api/search-taxon", get(search_taxon_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
