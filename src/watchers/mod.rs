// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes watchers that turn watch events into sync events.

pub mod secret;

pub use secret::{EventClassifier, SecretWatcher};
