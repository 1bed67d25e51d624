// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Secret watcher - turns the Secret watch stream into typed events for the sync manager.

use crate::sync::{SyncEvent, SyncManagerHandle};
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    runtime::{reflector::ObjectRef, watcher, WatchStreamExt},
    Api, Client,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Tracks which secrets have been seen so watch events can be told apart as
/// creations or updates, and keeps the latest snapshot of each for resyncs.
///
/// Stored snapshots carry metadata only; secret payloads are not kept in memory.
#[derive(Debug, Default)]
pub struct EventClassifier {
    known: HashMap<ObjectRef<Secret>, Secret>,
    /// Secrets seen during an in-progress re-list
    relisted: Option<HashSet<ObjectRef<Secret>>>,
}

impl EventClassifier {
    pub fn observe(&mut self, event: watcher::Event<Secret>) -> Option<SyncEvent> {
        match event {
            watcher::Event::Init => {
                self.relisted = Some(HashSet::new());
                None
            }
            watcher::Event::InitApply(secret) => {
                if let Some(relisted) = self.relisted.as_mut() {
                    relisted.insert(ObjectRef::from_obj(&secret));
                }
                Some(self.apply(secret))
            }
            watcher::Event::InitDone => {
                if let Some(relisted) = self.relisted.take() {
                    self.known.retain(|key, _| relisted.contains(key));
                }
                None
            }
            watcher::Event::Apply(secret) => Some(self.apply(secret)),
            watcher::Event::Delete(secret) => {
                let key = ObjectRef::from_obj(&secret);
                self.known.remove(&key);
                Some(SyncEvent::Deleted(key))
            }
        }
    }

    /// Latest snapshot of every known secret, re-delivered as updates
    pub fn resync(&self) -> Vec<SyncEvent> {
        self.known.values().cloned().map(SyncEvent::Updated).collect()
    }

    fn apply(&mut self, secret: Secret) -> SyncEvent {
        let snapshot = Secret {
            metadata: secret.metadata.clone(),
            type_: secret.type_.clone(),
            ..Default::default()
        };
        match self.known.insert(ObjectRef::from_obj(&secret), snapshot) {
            None => SyncEvent::Created(secret),
            Some(_) => SyncEvent::Updated(secret),
        }
    }
}

pub struct SecretWatcher {
    client: Client,
    sync_handle: SyncManagerHandle,
    namespace: Option<String>,
    resync_interval: Option<Duration>,
}

impl SecretWatcher {
    pub fn new(
        client: Client,
        sync_handle: SyncManagerHandle,
        namespace: Option<String>,
        resync_interval: Option<Duration>,
    ) -> Self {
        Self {
            client,
            sync_handle,
            namespace,
            resync_interval,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let secrets: Api<Secret> = match &self.namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        info!(
            "Watching secrets in {}",
            self.namespace.as_deref().unwrap_or("all namespaces")
        );

        let stream = watcher(secrets, WatcherConfig::default()).default_backoff();
        tokio::pin!(stream);

        let mut classifier = EventClassifier::default();
        let mut resync = self.resync_interval.map(|period| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                item = stream.next() => match item {
                    Some(Ok(event)) => {
                        if let Some(event) = classifier.observe(event) {
                            self.sync_handle.send(event).await;
                        }
                    }
                    Some(Err(e)) => warn!("Secret watch error: {}", e),
                    None => {
                        warn!("Secret watch stream ended");
                        return Ok(());
                    }
                },
                _ = tick(&mut resync) => {
                    let events = classifier.resync();
                    debug!("Resyncing {} secrets", events.len());
                    for event in events {
                        self.sync_handle.send(event).await;
                    }
                }
            }
        }
    }
}

/// Wait for the next resync tick, or forever when resync is disabled
async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
