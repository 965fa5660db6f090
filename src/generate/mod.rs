//! AI generation.
//!
//! This module provides:
//! - `GenerativeProvider` trait for code and image generation backends
//! - `GenerationBridge` with per-target request lifecycle
//! - Prompt assembly and response cleanup
//! - Gemini implementation and an offline mock

pub mod bridge;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod provider;

pub use bridge::{GenerationBridge, RequestState, RequestTicket};
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use prompt::{clean_code_fences, suggested_prompts, system_prompt};
pub use provider::{
    CodeRequest, GeneratedImage, GenerationTarget, GenerativeProvider, ImageRequest, ProviderInfo,
};

use std::sync::Arc;

/// Picks the provider for the current build.
///
/// The `provider-mock` feature forces the offline mock. Otherwise the
/// Gemini provider is used when compiled in, with the mock as the fallback
/// for builds without any network provider.
pub fn default_provider() -> Arc<dyn GenerativeProvider> {
    #[cfg(feature = "provider-mock")]
    {
        log::info!("Using mock generation provider (provider-mock feature)");
        Arc::new(MockProvider::new())
    }
    #[cfg(all(feature = "gemini", not(feature = "provider-mock")))]
    {
        Arc::new(GeminiProvider::new())
    }
    #[cfg(all(not(feature = "gemini"), not(feature = "provider-mock")))]
    {
        log::warn!("No network provider compiled in; using the offline mock");
        Arc::new(MockProvider::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_is_constructible() {
        let provider = default_provider();
        assert!(!provider.info().id.is_empty());
    }
}
