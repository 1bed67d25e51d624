// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Object store access: partial updates of secrets

use crate::constants::OPERATOR_NAME;
use crate::error::{Result, SyncError};
use crate::sync::patch::SecretPatch;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use tracing::{debug, instrument};

/// Store that can merge a patch into an existing secret
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Apply `patch` to `namespace/name`, leaving fields it does not mention untouched
    async fn patch_secret(&self, namespace: &str, name: &str, patch: &SecretPatch) -> Result<()>;
}

/// `SecretStore` backed by the Kubernetes API, using strategic merge patches
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    #[instrument(skip(self, patch))]
    async fn patch_secret(&self, namespace: &str, name: &str, patch: &SecretPatch) -> Result<()> {
        let payload = patch.to_payload()?;
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let pp = PatchParams {
            field_manager: Some(OPERATOR_NAME.to_string()),
            ..Default::default()
        };

        secrets
            .patch(name, &pp, &Patch::Strategic(&payload))
            .await
            .map_err(|source| SyncError::Patch {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            })?;

        debug!("Patched secret {}/{}", namespace, name);
        Ok(())
    }
}
