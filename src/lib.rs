// Copyright 2026, Jack Weinbender
// SPDX-License-Identifier: Apache-2.0
pub mod annotations;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod providers;
pub mod sync;
pub mod watchers;

#[cfg(test)]
pub mod test_utils;
