// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Central coordinator feeding secret events to the reconciler.

use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::SyncError;
use crate::kubernetes::secret_key;
use crate::sync::reconciler::{Reconciler, SyncOutcome};
use k8s_openapi::api::core::v1::Secret;
use kube::runtime::reflector::ObjectRef;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events the secret watcher sends to the SyncManager
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A secret was seen for the first time
    Created(Secret),
    /// A known secret changed, or is re-delivered by a resync
    Updated(Secret),
    /// A secret was deleted
    Deleted(ObjectRef<Secret>),
}

/// Processes events one at a time, so a secret is never patched concurrently
pub struct SyncManager {
    reconciler: Reconciler,
    event_rx: mpsc::Receiver<SyncEvent>,
}

/// Handle to send events to the SyncManager
#[derive(Clone)]
pub struct SyncManagerHandle {
    event_tx: mpsc::Sender<SyncEvent>,
}

impl SyncManagerHandle {
    pub async fn send(&self, event: SyncEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            error!("Failed to send event to SyncManager: {}", e);
        }
    }
}

impl SyncManager {
    pub fn new(reconciler: Reconciler) -> (Self, SyncManagerHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let manager = Self {
            reconciler,
            event_rx,
        };

        let handle = SyncManagerHandle { event_tx };
        (manager, handle)
    }

    /// Handle events until `shutdown` resolves or every handle is dropped
    pub async fn run<F>(mut self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("SyncManager started, listening for events...");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping SyncManager");
                    break;
                }
                event = self.event_rx.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("Event channel closed, stopping SyncManager");
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    async fn handle_event(&self, event: SyncEvent) {
        match event {
            SyncEvent::Created(secret) => {
                debug!("Secret {} created", secret_key(&secret));
                self.sync_secret(&secret).await;
            }
            SyncEvent::Updated(secret) => {
                debug!("Secret {} updated", secret_key(&secret));
                self.sync_secret(&secret).await;
            }
            SyncEvent::Deleted(obj) => {
                debug!(
                    "Secret {}/{} deleted",
                    obj.namespace.as_deref().unwrap_or_default(),
                    obj.name
                );
            }
        }
    }

    /// Reconcile one secret and log the result. Errors stop here.
    async fn sync_secret(&self, secret: &Secret) {
        let key = secret_key(secret);

        match self.reconciler.reconcile(secret).await {
            Ok(SyncOutcome::Synced { data_key }) => {
                info!(
                    "Successfully synced secret {} into key '{}' and set last-synced annotation",
                    key, data_key
                );
            }
            Ok(SyncOutcome::AlreadySynced { synced_at }) => {
                debug!("Secret {} already synced at {}, skipping", key, synced_at);
            }
            Ok(SyncOutcome::Ineligible { missing }) => {
                info!(
                    "Ignoring secret {} as it does not have the required '{}' annotation",
                    key, missing
                );
            }
            Err(e @ SyncError::UnsupportedProvider(_)) => {
                warn!("Not syncing secret {}: {}", key, e);
            }
            Err(e) => {
                error!("Failed to sync secret {}: {}", key, e);
            }
        }
    }
}
