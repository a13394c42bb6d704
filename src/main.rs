// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use emmie::api::{router, AppState, TokenStore};
use emmie::config::Config;
use emmie::lifecycle::LifecycleManager;
use emmie::registry::{HttpTagRegistry, TagRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting emmie");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: template_namespace={}",
        config.template_namespace
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let registry: Option<Arc<dyn TagRegistry>> = match &config.registry {
        Some(registry_config) => {
            info!(
                "Verifying branch tags against registry account {} in {}",
                registry_config.account_id, registry_config.region
            );
            Some(Arc::new(HttpTagRegistry::new(registry_config)?))
        }
        None => {
            info!("No registry configured, branch tags are assumed to exist");
            None
        }
    };

    let tokens = match &config.token_file {
        Some(path) => {
            let store = TokenStore::load(path)?;
            info!("Loaded {} API tokens from {}", store.len(), path.display());
            Some(store)
        }
        None => {
            info!("No token file configured, authentication disabled");
            None
        }
    };

    let listen_port = config.listen_port;
    let lifecycle = LifecycleManager::new(client, config, registry);
    let state = Arc::new(AppState { lifecycle, tokens });

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
