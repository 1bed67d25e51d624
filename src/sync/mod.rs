// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0

//! Provider to secret synchronization logic.

pub mod manager;
pub mod patch;
pub mod reconciler;

pub use manager::{SyncEvent, SyncManager, SyncManagerHandle};
pub use patch::SecretPatch;
pub use reconciler::{Reconciler, SyncOutcome};
