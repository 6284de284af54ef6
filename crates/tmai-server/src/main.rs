//! tmai HTTP Server
//!
//! Axum server exposing the Token Metrics tools over REST, for agents
//! that call tools over HTTP and for manual exploration.

mod handlers;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tmai_tools::TokenMetricsClient;

use crate::handlers::{call_tool, health_check, invoke_tool, list_tools};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG and TMAI_* can come from .env
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = TokenMetricsClient::from_env()
        .context("cannot start without Token Metrics credentials (set TMAI_API_KEY)")?;

    tracing::info!("Registered {} tools:", client.len());
    for name in client.names() {
        tracing::info!("  • {}", name);
    }

    let state = AppState {
        client: Arc::new(client),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("tmai-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/tools          - Function-calling definitions");
    tracing::info!("  POST /api/tools/{{name}}   - Invoke a tool with JSON arguments");
    tracing::info!("  POST /api/call           - Agent-style tool call");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(invoke_tool))
        .route("/api/call", post(call_tool))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
