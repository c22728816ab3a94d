//! Badminton scoreboard server.
//!
//! # Routes
//!
//! | Method     | Path                       | Description                              |
//! |------------|----------------------------|------------------------------------------|
//! | `GET`      | `/api/client-vmix`         | vMix usage hint                          |
//! | `GET`      | `/api/vmix/{id}`           | vMix data-source rows for a match        |
//! | `GET`      | `/api/health`              | Availability probe                       |
//! | `GET/POST` | `/api/matches`             | List (newest first) / create matches     |
//! | `GET`      | `/api/matches/{id}`        | One match                                |
//! | `POST`     | `/api/matches/{id}/point`  | Award a rally                            |
//! | `GET`      | `/api/courts/{n}`          | Active match on a court, or `null`       |
//! | `POST`     | `/api/courts/{n}/free`     | Finish the active match on a court       |
//! | `GET`      | `/api/players`             | Player roster                            |
//! | `GET/PUT`  | `/api/language`            | Global language preference               |
//! | `GET`      | `/sb/{n}`                  | Legacy short link to the scoreboard      |
//! | `GET`      | anything else              | Static web frontend (Dioxus build)       |
//!
//! Configuration comes from `PORT`, `STATIC_DIR` and `DATA_FILE`; see
//! [`config::ServerConfig`].

mod api;
mod config;
mod error;
mod persist;

#[cfg(test)]
mod end_to_end;

use std::net::SocketAddr;

use scoreboard_core::store::MemoryStore;
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialise tracing (respects RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let state = match &config.data_file {
        Some(path) => match persist::load(path).await {
            Ok(store) => {
                tracing::info!("Loaded data file {}", path.display());
                AppState::new(store).with_data_file(path)
            }
            Err(e) => {
                tracing::error!("Cannot load data file {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => AppState::new(MemoryStore::new()),
    };

    let static_dir = &config.static_dir;

    // Serve the Dioxus SPA: try static files first, fall back to index.html
    // for client-side routing.
    let serve_spa = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));

    let app = api::router(state).fallback_service(serve_spa);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Scoreboard server listening on {addr}");
    tracing::info!("Serving static files from {static_dir}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
