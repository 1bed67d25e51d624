// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! 1Password provider backed by the `op` CLI.
//!
//! References are 1Password secret references (`op://vault/item/field`) and are passed
//! through to `op read` untouched. The service account token is only placed in the child
//! process environment.

use super::SecretProvider;
use crate::config::ServiceAccountToken;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Name secrets use to select this provider
pub const PROVIDER_NAME: &str = "op";

const TOKEN_ENV: &str = "OP_SERVICE_ACCOUNT_TOKEN";

#[derive(Debug)]
pub struct OnePasswordProvider {
    program: PathBuf,
    /// Arguments placed before `read`
    leading_args: Vec<OsString>,
    token: ServiceAccountToken,
}

impl OnePasswordProvider {
    pub fn new(cli_path: PathBuf, token: ServiceAccountToken) -> Result<Self, ProviderError> {
        Self::with_command(cli_path, Vec::new(), token)
    }

    /// Run `program leading_args... read --no-newline -- <reference>` for each resolve
    pub fn with_command(
        program: PathBuf,
        leading_args: Vec<OsString>,
        token: ServiceAccountToken,
    ) -> Result<Self, ProviderError> {
        if token.expose().is_empty() {
            return Err(ProviderError::Auth(format!("{} is empty", TOKEN_ENV)));
        }

        Ok(Self {
            program,
            leading_args,
            token,
        })
    }
}

#[async_trait]
impl SecretProvider for OnePasswordProvider {
    #[instrument(skip(self))]
    async fn resolve(&self, reference: &str) -> Result<String, ProviderError> {
        debug!("Reading secret reference via {}", self.program.display());

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(["read", "--no-newline", "--", reference])
            .env(TOKEN_ENV, self.token.expose())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ProviderError::Unavailable(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(stderr.trim()));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            ProviderError::Unavailable("op returned a value that is not valid UTF-8".to_string())
        })
    }
}

/// Map `op` error output to a provider error kind
fn classify_failure(stderr: &str) -> ProviderError {
    let message = if stderr.is_empty() {
        "op exited with an error and no output".to_string()
    } else {
        stderr.to_string()
    };
    let lower = stderr.to_lowercase();

    // Not-found is checked first: `op` echoes the reference, which may contain words like "token".
    const NOT_FOUND_MARKERS: [&str; 4] =
        ["not found", "isn't an item", "no item", "could not find"];
    const AUTH_MARKERS: [&str; 5] = [
        "service account token",
        "unauthorized",
        "not currently signed in",
        "authentication",
        "session expired",
    ];

    if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
        ProviderError::NotFound(message)
    } else if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
        ProviderError::Auth(message)
    } else {
        ProviderError::Unavailable(message)
    }
}
