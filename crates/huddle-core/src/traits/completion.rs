// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for the LLM endpoint.

use async_trait::async_trait;

use crate::error::HuddleError;
use crate::types::CompletionRequest;

/// A fallible request/response completion call.
///
/// Implementations report failures of the service tier (unavailable, quota,
/// auth, transport) as [`HuddleError::ProviderService`] and everything else
/// as [`HuddleError::Provider`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the request and returns the generated text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, HuddleError>;
}
