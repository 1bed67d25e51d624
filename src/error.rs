// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

/// Failure reported by a secret provider for a single resolve call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Provider authentication failed: {0}")]
    Auth(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Failed to initialize provider {provider}: {source}")]
    ProviderInit {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to resolve secret reference {reference}: {source}")]
    Provider {
        reference: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to serialize patch: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to patch secret {namespace}/{name}: {source}")]
    Patch {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
