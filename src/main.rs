//! Perimetr · perimeter trainer backend
//!
//! - Axum HTTP + WebSocket API around the quiz session engine
//! - Leaderboard persisted as a JSON blob under the data dir
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000, overrides the config file)
//!   PERIMETR_CONFIG  : path to TOML settings (data dir, records key, rng seed)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod catalog;
mod config;
mod domain;
mod generator;
mod judge;
mod logic;
mod protocol;
mod records;
mod render;
mod routes;
mod session;
mod state;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let settings = Settings::load_from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

  // Shared state: session table plus the record store.
  let state = Arc::new(AppState::new(settings));
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "perimetr_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "perimetr_backend", error = %e, "Failed to listen for ctrl-c");
  }
  info!(target: "perimetr_backend", "Shutting down");
}
