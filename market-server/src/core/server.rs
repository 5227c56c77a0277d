//! Server Implementation
//!
//! HTTP server startup and graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (tests construct state themselves)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)
                .await
                .map_err(anyhow::Error::new)?,
        };

        let app = api::build_app(&state).with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Market server listening on {}", addr);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}
