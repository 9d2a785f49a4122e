//! `token-svc` — binary entry point.
//!
//! Startup sequence:
//! 1. Load the environment file and validate [`Config`] from environment variables.
//! 2. Initialise telemetry (JSON logs, optional OTLP export).
//! 3. Build the token minter and credential-file policy into [`AppState`].
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod files;
mod server;
mod telemetry;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config::{Config, EnvFile};
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let (env_file, cfg) = config::load_env_file()
        .and_then(|env_file| Ok((env_file, Config::from_env()?)))
        .map_err(|e| {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            e
        })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    match &env_file {
        EnvFile::Loaded(path) => info!(path = %path.display(), "loaded env file"),
        EnvFile::Missing(path) => info!(path = %path.display(), "no env file, using process environment"),
    }

    // -----------------------------------------------------------------------
    // 3. Application state
    // -----------------------------------------------------------------------
    let state = AppState::from_config(&cfg).await?;
    match state.files.root() {
        Some(root) => info!(credentials_dir = %root.display(), "credential files restricted"),
        None => warn!("CREDENTIALS_DIR is unset; callers may name any file this process can read"),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        token_kind = state.token_kind.as_str(),
        "token-svc starting"
    );

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = server::router::build(state, cfg.request_timeout());

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router).await?;

    Ok(())
}
