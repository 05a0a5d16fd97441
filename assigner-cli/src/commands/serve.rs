//! Serve command - run the HTTP server

use std::sync::Arc;

use assigner_core::{AssignmentService, Config, MemoryStore};
use clap::Args;
use tokio::net::TcpListener;

use super::open_service;
use crate::http;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(short, long)]
    pub address: Option<String>,

    /// Keep all state in memory instead of the database
    #[arg(long)]
    pub ephemeral: bool,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = if self.ephemeral {
            tracing::warn!("Running with in-memory state; nothing will be persisted");
            AssignmentService::new(Arc::new(MemoryStore::new()))
        } else {
            open_service(config).await?
        };

        let app = http::router(service, config.server.request_timeout);

        // --address is already folded into the config
        let listener = TcpListener::bind(&config.server.address).await?;
        tracing::info!(
            address = %listener.local_addr()?,
            timeout = ?config.server.request_timeout,
            "Server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
