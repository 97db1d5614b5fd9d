mod config;
mod db;
mod error;
mod intensity;
mod state;
mod web_ui;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contador_de_dramas=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create tables up front at bootstrap, not lazily on first request
    let db = db::init_database(&config.database_url)
        .await
        .expect("Failed to initialize database");
    tracing::info!("Database ready at {}", config.database_url);

    let state = Arc::new(AppState { db });

    let app = web_ui::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Contador de Dramas listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
