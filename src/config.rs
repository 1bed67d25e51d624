// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0
use crate::annotations::AnnotationKeys;
use crate::constants::annotations::DEFAULT_PREFIX;
use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SECRET_DATA_KEY};
use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// 1Password service account token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountToken(String);

impl ServiceAccountToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceAccountToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceAccountToken(<redacted>)")
    }
}

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Annotation keys recognized on secrets
    pub annotations: AnnotationKeys,
    /// Data key used when a secret does not name one
    pub default_secret_data_key: String,
    /// Interval between full resyncs, `None` disables resync
    pub poll_interval: Option<Duration>,
    /// Restrict the watch to a single namespace
    pub watch_namespace: Option<String>,
    /// Path of the 1Password CLI
    pub op_cli_path: PathBuf,
    pub op_service_account_token: ServiceAccountToken,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let token = get("OP_SERVICE_ACCOUNT_TOKEN")
            .context("OP_SERVICE_ACCOUNT_TOKEN environment variable not set")?;

        let prefix = get("KSS_ANNOTATION_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let defaults = AnnotationKeys::with_prefix(&prefix);
        let annotations = AnnotationKeys {
            provider_name: get("KSS_SECRET_ANNOTATION_KEY_PROVIDER_NAME")
                .unwrap_or(defaults.provider_name),
            provider_ref: get("KSS_SECRET_ANNOTATION_KEY_PROVIDER_REF")
                .unwrap_or(defaults.provider_ref),
            secret_key: get("KSS_SECRET_ANNOTATION_KEY_SECRET_KEY").unwrap_or(defaults.secret_key),
        };

        let poll_secs = parse_or(
            "KSS_POLL_INTERVAL",
            get("KSS_POLL_INTERVAL"),
            DEFAULT_POLL_INTERVAL_SECS,
        );

        Ok(Config {
            annotations,
            default_secret_data_key: get("KSS_DEFAULT_SECRET_DATA_KEY")
                .unwrap_or_else(|| DEFAULT_SECRET_DATA_KEY.to_string()),
            poll_interval: (poll_secs > 0).then(|| Duration::from_secs(poll_secs)),
            watch_namespace: get("KSS_WATCH_NAMESPACE"),
            op_cli_path: get("KSS_OP_CLI_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("op")),
            op_service_account_token: ServiceAccountToken::new(token),
        })
    }
}

/// Parse `value`, keeping `default` when it is unset or not a valid `T`
fn parse_or<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using default {}", raw, name, default);
            default
        }),
        None => default,
    }
}
