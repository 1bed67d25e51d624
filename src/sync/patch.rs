// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Construction of the merge patch written back to a synced secret.

use crate::constants::annotations::LAST_SYNCED;
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;
use std::fmt;

/// Format a sync time the way the `last-synced` marker stores it (RFC3339, UTC, seconds)
pub fn sync_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Partial update for a secret: the full annotation map plus the single destination data key.
/// Every other field of the secret is left alone by the store.
#[derive(Clone, PartialEq)]
pub struct SecretPatch {
    pub annotations: BTreeMap<String, String>,
    pub data: BTreeMap<String, ByteString>,
}

impl SecretPatch {
    /// Copy `existing` annotations, stamp `last-synced` with `synced_at` and
    /// place `value` under `data_key`
    pub fn new(
        existing: &BTreeMap<String, String>,
        data_key: &str,
        value: String,
        synced_at: DateTime<Utc>,
    ) -> Self {
        let mut annotations = existing.clone();
        annotations.insert(LAST_SYNCED.to_string(), sync_timestamp(synced_at));

        Self {
            annotations,
            data: BTreeMap::from([(data_key.to_string(), ByteString(value.into_bytes()))]),
        }
    }

    /// JSON body for a strategic merge patch
    pub fn to_payload(&self) -> Result<serde_json::Value> {
        let secret = Secret {
            metadata: ObjectMeta {
                annotations: Some(self.annotations.clone()),
                ..Default::default()
            },
            data: Some(self.data.clone()),
            ..Default::default()
        };

        Ok(serde_json::to_value(&secret)?)
    }
}

impl fmt::Debug for SecretPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPatch")
            .field("annotations", &self.annotations)
            .field("data_keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}
