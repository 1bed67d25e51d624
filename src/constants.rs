// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys and key defaults used by k8s-secret-sync
pub mod annotations {
    /// Prefix shared by all configurable annotation keys
    pub const DEFAULT_PREFIX: &str = "k8s-secret-sync.weinbender.io";
    /// Suffix of the annotation naming the provider (e.g. "op")
    pub const PROVIDER_NAME_SUFFIX: &str = "provider-name";
    /// Suffix of the annotation holding the provider-specific reference
    pub const PROVIDER_REF_SUFFIX: &str = "provider-ref";
    /// Suffix of the annotation overriding the destination data key
    pub const SECRET_KEY_SUFFIX: &str = "secret-key";
    /// Marker annotation written once a secret has been synced. Not configurable.
    pub const LAST_SYNCED: &str = "last-synced";
}

/// Data key the fetched value is stored under when no override is given
pub const DEFAULT_SECRET_DATA_KEY: &str = "value";

/// Default interval between full resyncs of known secrets
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// The operator name used as field manager for patches
pub const OPERATOR_NAME: &str = "k8s-secret-sync";

/// Capacity of the channel between the secret watcher and the sync manager
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
