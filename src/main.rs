// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};

use k8s_secret_sync::config::Config;
use k8s_secret_sync::kubernetes::KubeSecretStore;
use k8s_secret_sync::providers::default_registry;
use k8s_secret_sync::sync::{Reconciler, SyncManager};
use k8s_secret_sync::watchers::SecretWatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting k8s-secret-sync operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: provider={}, ref={}, secret_key={}, default_key={}, poll={:?}",
        config.annotations.provider_name,
        config.annotations.provider_ref,
        config.annotations.secret_key,
        config.default_secret_data_key,
        config.poll_interval
    );

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    let reconciler = Reconciler::new(
        Arc::new(KubeSecretStore::new(client.clone())),
        default_registry(&config),
        config.annotations.clone(),
        config.default_secret_data_key.clone(),
    );

    // Create the sync manager and get a handle for the watcher
    let (sync_manager, sync_handle) = SyncManager::new(reconciler);
    let secret_watcher = SecretWatcher::new(
        client,
        sync_handle,
        config.watch_namespace.clone(),
        config.poll_interval,
    );

    info!("Starting secret watcher...");

    tokio::select! {
        res = sync_manager.run(shutdown_signal()) => res?,
        res = secret_watcher.run() => {
            res?;
            warn!("Secret watcher stopped unexpectedly");
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
