// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Annotation schema: which keys mark a secret for syncing and how to read them.

use crate::constants::annotations::{
    DEFAULT_PREFIX, LAST_SYNCED, PROVIDER_NAME_SUFFIX, PROVIDER_REF_SUFFIX, SECRET_KEY_SUFFIX,
};
use std::collections::BTreeMap;

/// What a secret asks to have synced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncIntent<'a> {
    pub provider_name: &'a str,
    pub reference: &'a str,
    pub data_key: &'a str,
}

/// Result of reading a secret's annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility<'a> {
    Eligible(SyncIntent<'a>),
    /// A required annotation is absent or empty; `missing` names the key
    Ineligible { missing: &'a str },
}

/// Concrete annotation keys for each logical role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationKeys {
    /// Selects the secret provider
    pub provider_name: String,
    /// Opaque reference handed to the provider
    pub provider_ref: String,
    /// Overrides the destination data key
    pub secret_key: String,
}

impl AnnotationKeys {
    /// Derive all keys from a common prefix, e.g. `<prefix>/provider-name`
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        Self {
            provider_name: format!("{}/{}", prefix, PROVIDER_NAME_SUFFIX),
            provider_ref: format!("{}/{}", prefix, PROVIDER_REF_SUFFIX),
            secret_key: format!("{}/{}", prefix, SECRET_KEY_SUFFIX),
        }
    }

    /// Extract the sync intent, falling back to `default_data_key` when no override is set
    pub fn intent<'a>(
        &'a self,
        annotations: &'a BTreeMap<String, String>,
        default_data_key: &'a str,
    ) -> Eligibility<'a> {
        let Some(provider_name) = non_empty(annotations, &self.provider_name) else {
            return Eligibility::Ineligible {
                missing: &self.provider_name,
            };
        };
        let Some(reference) = non_empty(annotations, &self.provider_ref) else {
            return Eligibility::Ineligible {
                missing: &self.provider_ref,
            };
        };
        let data_key = non_empty(annotations, &self.secret_key).unwrap_or(default_data_key);

        Eligibility::Eligible(SyncIntent {
            provider_name,
            reference,
            data_key,
        })
    }
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

/// Look up an annotation, treating an empty value the same as a missing one
pub fn non_empty<'a>(annotations: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Timestamp of the last successful sync, if the marker is set
pub fn last_synced(annotations: &BTreeMap<String, String>) -> Option<&str> {
    non_empty(annotations, LAST_SYNCED)
}
