mod api;
mod state;

use crate::state::AppState;
use axum::routing::get;
use mystops::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    if config.api_key.is_empty() {
        error!("MYSTOPS_TRIMET_API_KEY is not set, TriMet will reject requests");
    }
    let port = match std::env::var("MYSTOPS_PORT") {
        Ok(value) => match value.trim().parse() {
            Ok(port) => port,
            Err(_) => {
                error!("Invalid MYSTOPS_PORT: {value}");
                std::process::exit(1);
            }
        },
        Err(_) => DEFAULT_PORT,
    };
    let client = match TriMetClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to create TriMet client: {err}");
            std::process::exit(1);
        }
    };
    let state = Arc::new(AppState::new(client, config));

    let app = axum::Router::new()
        .route("/arrivals", get(api::arrivals))
        .route("/health", get(api::health))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
