// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client access for reading and patching secrets.

pub mod store;

pub use store::{KubeSecretStore, SecretStore};

use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;

/// `namespace/name` of a secret, for logging
pub fn secret_key(secret: &Secret) -> String {
    format!("{}/{}", secret.namespace().unwrap_or_default(), secret.name_any())
}
