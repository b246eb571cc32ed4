pub mod config;
pub mod http;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use songbook_core::services::SongService;
use songbook_storage::SqliteSongRepository;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::http::AppState;
use crate::infrastructure::logger::Logger;

/// Boots the catalog service and blocks until it has shut down.
pub async fn run() -> anyhow::Result<()> {
  // A missing .env file is the normal case outside development.
  dotenvy::dotenv().ok();
  Logger::init()?;

  let server = ServerConfig::load()?;

  // --- Dependency wiring ---
  let storage = SqliteSongRepository::new_from_config()?;
  let state = AppState::new(SongService::new(storage));
  let app = http::router(state);

  let listener = TcpListener::bind(server.bind_addr()).await?;
  info!(addr = %listener.local_addr()?, "server started");

  serve(listener, app, server.shutdown_grace()).await
}

/// Serves `app` until a shutdown signal arrives, then gives in-flight
/// requests `grace` to complete before dropping them.
async fn serve(listener: TcpListener, app: axum::Router, grace: Duration) -> anyhow::Result<()> {
  let stop = Arc::new(Notify::new());
  let graceful = {
    let stop = stop.clone();
    axum::serve(listener, app).with_graceful_shutdown(async move { stop.notified().await })
  };
  let mut server = tokio::spawn(graceful.into_future());

  tokio::select! {
    finished = &mut server => {
      finished??;
      return Ok(());
    }
    () = shutdown_signal() => {}
  }

  info!(grace_secs = grace.as_secs(), "shutting down server");
  stop.notify_one();

  match tokio::time::timeout(grace, &mut server).await {
    Ok(finished) => finished??,
    Err(_) => {
      warn!("graceful shutdown timed out, dropping remaining connections");
      server.abort();
    }
  }

  info!("server exited");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {}
    () = terminate => {}
  }
}
