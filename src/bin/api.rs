//! VeTube API server
//!
//! Serves the JSON error façade and health endpoint until Ctrl-C.

use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vetube::{
    api::{self, AppContext},
    config,
    error::Result,
};

#[tokio::main]
async fn main() -> ExitCode {
    let api_config = match config::load_api() {
        Ok(api_config) => api_config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let default_level = if api_config.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match serve(AppContext::new(api_config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(ctx: AppContext) -> Result<()> {
    let listener = TcpListener::bind((ctx.config.host.as_str(), ctx.config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, api::router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
