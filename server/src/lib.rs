//! Documentation of a small cake shop backend.
//!
//! CRUD over the cake catalog, a templated homepage, and a chatbot that
//! answers from the catalog when it can and falls back to Gemini when it
//! cannot.
//!
//!
//!
//! # General Infrastructure
//! - One axum process, request-per-call, no background jobs
//! - The catalog store is the only shared mutable resource
//! - Two storage backends behind one trait: in-memory (default, seeded with
//!   demo cakes) and Postgres (set `DATABASE_URL`)
//! - The chatbot never fails outward: a catalog miss goes to Gemini, a
//!   Gemini miss becomes a canned apology
//!
//!
//!
//! # Endpoints
//!
//! | Verb | Path | Result |
//! |---|---|---|
//! | GET | /cakes | all cakes |
//! | GET | /cakes/{id} | one cake or 404 |
//! | POST | /cakes | created cake, 201 |
//! | PUT | /cakes/{id} | updated cake or 404 |
//! | DELETE | /cakes/{id} | confirmation or 404 |
//! | POST | /chatbot | `{source, reply}` |
//! | GET | / | homepage |
//!
//!
//!
//! # Configuration
//!
//! Everything comes from the environment, with logged defaults:
//!
//! - `RUST_PORT` — listen port, default 8000
//! - `DATABASE_URL` — Postgres connection string; unset means in-memory
//! - `GEMINI_API_KEY` — AI credential; unset means the chatbot degrades to
//!   a canned reply instead of calling out
//! - `AI_MODELS` — comma-separated candidate models, tried in order
//! - `AI_TIMEOUT_SECS` — per-attempt timeout, default 10
//! - `MATCH_STRATEGY` — `containment` or `similarity`, default containment
//!
//!
//!
//! # Setup
//!
//! Run locally against the in-memory catalog.
//! ```sh
//! RUST_LOG=info cargo run -p cakeshop
//! ```
//!
//! Poke the running server.
//! ```sh
//! cargo run -p tester
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod ai;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod matcher;
pub mod routes;
pub mod state;

use routes::{
    chatbot_handler, create_cake, delete_cake, get_cake, index_handler, list_cakes, update_cake,
};
use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/cakes", get(list_cakes).post(create_cake))
        .route(
            "/cakes/:id",
            get(get_cake).put(update_cake).delete(delete_cake),
        )
        .route("/chatbot", post(chatbot_handler))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
