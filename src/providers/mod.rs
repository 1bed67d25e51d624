// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Secret providers and the name → provider registry.

pub mod onepassword;

pub use onepassword::OnePasswordProvider;

use crate::config::Config;
use crate::error::{ProviderError, Result, SyncError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// An external system holding secret values, addressed by opaque references
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the current value for `reference`. Every call goes to the provider.
    async fn resolve(&self, reference: &str) -> std::result::Result<String, ProviderError>;
}

type ProviderFactory =
    Box<dyn Fn() -> std::result::Result<Arc<dyn SecretProvider>, ProviderError> + Send + Sync>;

struct ProviderEntry {
    factory: ProviderFactory,
    instance: OnceCell<Arc<dyn SecretProvider>>,
}

/// Providers by name, each built on first use and shared afterwards
#[derive(Default)]
pub struct ProviderRegistry {
    entries: HashMap<String, ProviderEntry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous registration
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> std::result::Result<Arc<dyn SecretProvider>, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        self.entries.insert(
            name.into(),
            ProviderEntry {
                factory: Box::new(factory),
                instance: OnceCell::new(),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the provider registered as `name`, constructing it if this is the first use.
    /// A failed construction is not cached.
    pub async fn get(&self, name: &str) -> Result<Arc<dyn SecretProvider>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| SyncError::UnsupportedProvider(name.to_string()))?;

        let provider = entry
            .instance
            .get_or_try_init(|| async {
                info!("Initializing secret provider '{}'", name);
                (entry.factory)()
            })
            .await
            .map_err(|source| SyncError::ProviderInit {
                provider: name.to_string(),
                source,
            })?;

        Ok(Arc::clone(provider))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

/// Registry with every built-in provider, configured from `config`
pub fn default_registry(config: &Config) -> ProviderRegistry {
    let cli_path = config.op_cli_path.clone();
    let token = config.op_service_account_token.clone();

    ProviderRegistry::new().register(onepassword::PROVIDER_NAME, move || {
        let provider = OnePasswordProvider::new(cli_path.clone(), token.clone())?;
        Ok(Arc::new(provider) as Arc<dyn SecretProvider>)
    })
}
