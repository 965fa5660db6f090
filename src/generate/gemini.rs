//! Gemini-backed generation provider.
//!
//! Sends assembled prompts to the Gemini `generateContent` endpoint over
//! blocking HTTP and cleans the response down to raw code. Network support
//! is gated behind the `gemini` feature; without it every code request
//! fails with a clear error instead of silently degrading.

use chrono::Utc;
use std::env;

use crate::error::{Result, TriptychError};
use crate::generate::prompt;
use crate::generate::provider::{
    CodeRequest, GeneratedImage, GenerativeProvider, ImageRequest, ProviderInfo,
};

/// Default endpoint prefix for the Gemini REST API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for code generation.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Provider that calls the Gemini API.
pub struct GeminiProvider {
    info: ProviderInfo,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl GeminiProvider {
    /// Creates a provider from the environment.
    ///
    /// Reads `TRIPTYCH_GEMINI_API_KEY`, `TRIPTYCH_GEMINI_API_URL`,
    /// `TRIPTYCH_GEMINI_MODEL`, and `TRIPTYCH_GEMINI_TIMEOUT_MS`, falling
    /// back to the defaults above.
    pub fn new() -> Self {
        let api_url = env::var("TRIPTYCH_GEMINI_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model =
            env::var("TRIPTYCH_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = env::var("TRIPTYCH_GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout_ms = env::var("TRIPTYCH_GEMINI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self::with_config(api_url, model, api_key, timeout_ms)
    }

    /// Creates a provider with explicit settings.
    pub fn with_config(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout_ms: u64,
    ) -> Self {
        let model = model.into();
        let info = ProviderInfo {
            id: "gemini".to_string(),
            name: "Gemini".to_string(),
            version: model.clone(),
            description: "Google Gemini generateContent API".to_string(),
            capabilities: vec!["code".to_string(), "image".to_string()],
        };
        GeminiProvider {
            info,
            api_url: api_url.into(),
            model,
            api_key,
            timeout_ms,
        }
    }

    /// Replaces the API key, e.g. with one loaded from the config file.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(feature = "gemini")]
    fn send_request(&self, full_prompt: &str, api_key: &str) -> Result<String> {
        use std::time::Duration;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, self.model, api_key
        );
        log::debug!("POST {}", url.replace(api_key, "***"));

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: full_prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig::default(),
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| TriptychError::ServiceUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        let response = client.post(&url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                TriptychError::ServiceTimeout {
                    timeout_ms: self.timeout_ms,
                }
            } else if e.is_connect() {
                TriptychError::ServiceUnavailable {
                    reason: format!("Cannot reach generation service: {}", e),
                }
            } else {
                TriptychError::ServiceUnavailable {
                    reason: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            log::error!("Generation service error {}: {}", status, message);
            return Err(TriptychError::ServiceStatus {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse =
            response
                .json()
                .map_err(|e| TriptychError::InvalidServiceResponse {
                    reason: format!("Malformed JSON: {}", e),
                })?;

        let candidate = parsed.candidates.into_iter().next().ok_or_else(|| {
            TriptychError::InvalidServiceResponse {
                reason: "no candidates in response".to_string(),
            }
        })?;
        let part = candidate.content.parts.into_iter().next().ok_or_else(|| {
            TriptychError::InvalidServiceResponse {
                reason: "no parts in candidate content".to_string(),
            }
        })?;
        Ok(part.text)
    }

    #[cfg(not(feature = "gemini"))]
    fn send_request(&self, _full_prompt: &str, _api_key: &str) -> Result<String> {
        Err(TriptychError::ProviderNotCompiled)
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        GeminiProvider::new()
    }
}

impl GenerativeProvider for GeminiProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn generate_code(&self, request: &CodeRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TriptychError::MissingCredential)?;

        log::info!(
            "Generating {} code with model {} for prompt: {}",
            request.language,
            self.model,
            request.prompt
        );
        let text = self.send_request(&prompt::full_prompt(request), api_key)?;
        Ok(prompt::clean_code_fences(&text))
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        // Gemini does not expose image generation on this endpoint yet.
        // Serve the documented placeholder instead of calling the model.
        let generated_at = Utc::now();
        log::warn!(
            "Image generation returned a placeholder URL for prompt: {}",
            request.prompt
        );
        Ok(GeneratedImage {
            image_url: format!(
                "https://picsum.photos/800/600?random={}",
                generated_at.timestamp_millis()
            ),
            prompt: request.prompt.clone(),
            generated_at,
        })
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "gemini") && self.api_key.is_some()
    }
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Serialize)]
struct GeminiPart {
    text: String,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[cfg(feature = "gemini")]
impl Default for GeminiGenerationConfig {
    fn default() -> Self {
        GeminiGenerationConfig {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[cfg(feature = "gemini")]
#[derive(Debug, serde::Deserialize)]
struct GeminiResponsePart {
    text: String,
}
