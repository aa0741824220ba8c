// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for huddle.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the storage, platform, provider and agent crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HuddleError;
pub use types::{AdapterType, AppendOutcome, HealthStatus, Platform};

pub use traits::{
    CompletionProvider, HistoryStore, PluginAdapter, PollableChatApi, PushHandler, ReplySink,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Provider, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _plugin(_: &dyn PluginAdapter) {}
        fn _chat(_: &dyn PollableChatApi) {}
        fn _sink(_: &dyn ReplySink) {}
        fn _provider(_: &dyn CompletionProvider) {}
        fn _store(_: &dyn HistoryStore) {}
        fn _push(_: &dyn PushHandler) {}
    }
}
