//! Mock provider for offline work and tests.
//!
//! Generates deterministic placeholder fragments in the same shape a real
//! provider would return: code stubs appended to the current pane contents,
//! and placeholder image URLs. Always compiled, no network.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, TriptychError};
use crate::generate::provider::{
    CodeRequest, GeneratedImage, GenerativeProvider, ImageRequest, ProviderInfo,
};
use crate::session::BufferKind;

/// Provider that fabricates plausible output locally.
pub struct MockProvider {
    info: ProviderInfo,
    calls: AtomicU64,
    fail: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        MockProvider {
            info: ProviderInfo {
                id: "mock".to_string(),
                name: "Mock Provider".to_string(),
                version: "1.0.0".to_string(),
                description: "Deterministic offline placeholder generator".to_string(),
                capabilities: vec!["code".to_string(), "image".to_string()],
            },
            calls: AtomicU64::new(0),
            fail: false,
        }
    }

    /// A mock that reports itself unavailable and fails every request.
    pub fn failing() -> Self {
        let mut provider = MockProvider::new();
        provider.fail = true;
        provider
    }

    /// Number of generate calls received so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn stub_for(request: &CodeRequest) -> String {
        match request.language {
            BufferKind::Markup => format!(
                "{}\n<!-- AI generated: {} -->\n<div class=\"ai-generated\">\n    \
                 <p>AI generated content</p>\n</div>",
                request.current_code, request.prompt
            ),
            BufferKind::Style => format!(
                "{}\n/* AI generated: {} */\n.ai-generated {{\n    \
                 border: 2px solid #007bff;\n    padding: 15px;\n    \
                 margin: 10px 0;\n    border-radius: 8px;\n}}",
                request.current_code, request.prompt
            ),
            BufferKind::Script => format!(
                "{}\n// AI generated: {}\nfunction aiFunction() {{\n    \
                 console.log('AI generated function');\n}}",
                request.current_code, request.prompt
            ),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        MockProvider::new()
    }
}

impl GenerativeProvider for MockProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn generate_code(&self, request: &CodeRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TriptychError::ServiceUnavailable {
                reason: "mock provider configured to fail".to_string(),
            });
        }
        log::debug!(
            "Mock generating {} stub for prompt: {}",
            request.language,
            request.prompt
        );
        Ok(Self::stub_for(request))
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(TriptychError::ServiceUnavailable {
                reason: "mock provider configured to fail".to_string(),
            });
        }
        Ok(GeneratedImage {
            image_url: format!("https://picsum.photos/800/600?random={}", call),
            prompt: request.prompt.clone(),
            generated_at: Utc::now(),
        })
    }

    fn is_available(&self) -> bool {
        !self.fail
    }
}
