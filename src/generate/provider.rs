//! Provider abstraction for AI generation.
//!
//! A [`GenerativeProvider`] turns prompts into code fragments or image
//! records. The engine talks only to this trait; whether the other side is
//! a remote model or a local mock is a construction-time choice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, TriptychError};
use crate::session::BufferKind;

/// What a generation request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationTarget {
    Markup,
    Style,
    Script,
    Image,
}

impl GenerationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationTarget::Markup => "markup",
            GenerationTarget::Style => "style",
            GenerationTarget::Script => "script",
            GenerationTarget::Image => "image",
        }
    }

    /// Parses a target name, accepting pane names, language names, and
    /// "image".
    pub fn parse(s: &str) -> Result<GenerationTarget> {
        if s.trim().eq_ignore_ascii_case("image") {
            return Ok(GenerationTarget::Image);
        }
        BufferKind::parse(s).map(GenerationTarget::from)
    }

    /// The pane this target writes into, or `None` for images.
    pub fn buffer_kind(&self) -> Option<BufferKind> {
        match self {
            GenerationTarget::Markup => Some(BufferKind::Markup),
            GenerationTarget::Style => Some(BufferKind::Style),
            GenerationTarget::Script => Some(BufferKind::Script),
            GenerationTarget::Image => None,
        }
    }
}

impl From<BufferKind> for GenerationTarget {
    fn from(kind: BufferKind) -> Self {
        match kind {
            BufferKind::Markup => GenerationTarget::Markup,
            BufferKind::Style => GenerationTarget::Style,
            BufferKind::Script => GenerationTarget::Script,
        }
    }
}

impl fmt::Display for GenerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GenerationTarget {
    type Err = TriptychError;

    fn from_str(s: &str) -> Result<GenerationTarget> {
        GenerationTarget::parse(s)
    }
}

/// Static description of a provider implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub capabilities: Vec<String>,
}

/// A request to generate code for one pane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub prompt: String,
    pub language: BufferKind,
    /// Contents of the target pane at request time. When non-empty the
    /// provider is asked to modify or extend it instead of starting fresh.
    #[serde(default)]
    pub current_code: String,
}

impl CodeRequest {
    pub fn new(prompt: impl Into<String>, language: BufferKind) -> Self {
        CodeRequest {
            prompt: prompt.into(),
            language,
            current_code: String::new(),
        }
    }

    pub fn with_current_code(mut self, code: impl Into<String>) -> Self {
        self.current_code = code.into();
        self
    }
}

/// A request to generate an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        ImageRequest {
            prompt: prompt.into(),
            project_id: None,
        }
    }

    pub fn for_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// The outcome of an image generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub image_url: String,
    pub prompt: String,
    pub generated_at: DateTime<Utc>,
}

/// A source of generated code and images.
///
/// Implementations must be safe to share across threads; the bridge holds
/// providers behind an `Arc`.
pub trait GenerativeProvider: Send + Sync {
    /// Describes this provider.
    fn info(&self) -> &ProviderInfo;

    /// Generates replacement contents for the requested pane.
    fn generate_code(&self, request: &CodeRequest) -> Result<String>;

    /// Generates an image record for the prompt.
    fn generate_image(&self, request: &ImageRequest) -> Result<GeneratedImage>;

    /// Whether the provider can currently serve requests.
    fn is_available(&self) -> bool {
        true
    }
}
