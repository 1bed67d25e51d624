// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Per-secret sync decision: eligibility, idempotency, fetch and write-back.

use crate::annotations::{last_synced, AnnotationKeys, Eligibility};
use crate::error::{Result, SyncError};
use crate::kubernetes::{secret_key, SecretStore};
use crate::providers::ProviderRegistry;
use crate::sync::patch::SecretPatch;
use chrono::Utc;
use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Terminal state of a reconciliation that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A required annotation is absent or empty
    Ineligible { missing: String },
    /// The `last-synced` marker is already set
    AlreadySynced { synced_at: String },
    /// The value was fetched and written under `data_key`
    Synced { data_key: String },
}

pub struct Reconciler {
    store: Arc<dyn SecretStore>,
    providers: ProviderRegistry,
    annotations: AnnotationKeys,
    default_data_key: String,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn SecretStore>,
        providers: ProviderRegistry,
        annotations: AnnotationKeys,
        default_data_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            providers,
            annotations,
            default_data_key: default_data_key.into(),
        }
    }

    /// Sync `secret` from its provider, at most one fetch and one patch.
    ///
    /// On error the secret is left unchanged and nothing is remembered, so the next event
    /// for the same secret starts over.
    #[instrument(skip(self, secret), fields(secret = %secret_key(secret)))]
    pub async fn reconcile(&self, secret: &Secret) -> Result<SyncOutcome> {
        let annotations = secret.annotations();

        let intent = match self.annotations.intent(annotations, &self.default_data_key) {
            Eligibility::Eligible(intent) => intent,
            Eligibility::Ineligible { missing } => {
                return Ok(SyncOutcome::Ineligible {
                    missing: missing.to_string(),
                })
            }
        };

        if let Some(synced_at) = last_synced(annotations) {
            return Ok(SyncOutcome::AlreadySynced {
                synced_at: synced_at.to_string(),
            });
        }

        info!(
            "Syncing secret from provider '{}' into key '{}'",
            intent.provider_name, intent.data_key
        );

        let provider = self.providers.get(intent.provider_name).await?;
        let value = provider
            .resolve(intent.reference)
            .await
            .map_err(|source| SyncError::Provider {
                reference: intent.reference.to_string(),
                source,
            })?;

        let patch = SecretPatch::new(annotations, intent.data_key, value, Utc::now());
        debug!("Submitting patch {:?}", patch);

        let namespace = secret.namespace().unwrap_or_default();
        self.store
            .patch_secret(&namespace, &secret.name_any(), &patch)
            .await?;

        Ok(SyncOutcome::Synced {
            data_key: intent.data_key.to_string(),
        })
    }
}
