//! Project records and drafts.
//!
//! Field names on the wire stay aligned with the hosted schema
//! (`html_code`, `css_code`, `js_code`, `user_id`); the Rust side uses the
//! pane vocabulary the rest of the engine speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generate::GeneratedImage;
use crate::session::SourceBuffers;

/// Title given to projects saved without one.
pub const DEFAULT_TITLE: &str = "Untitled Project";

/// A saved project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "html_code")]
    pub markup: String,
    #[serde(rename = "css_code")]
    pub style: String,
    #[serde(rename = "js_code")]
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// The three panes of this project as session buffers.
    pub fn buffers(&self) -> SourceBuffers {
        SourceBuffers::from_parts(
            self.markup.clone(),
            self.style.clone(),
            self.script.clone(),
        )
    }
}

/// Fields to create or update a project. Absent fields keep their stored
/// values on update and fall back to defaults on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        rename = "html_code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub markup: Option<String>,
    #[serde(
        rename = "css_code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub style: Option<String>,
    #[serde(
        rename = "js_code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl ProjectDraft {
    pub fn new() -> Self {
        ProjectDraft::default()
    }

    /// A draft carrying the three pane contents of a session.
    pub fn from_buffers(buffers: &SourceBuffers) -> Self {
        ProjectDraft {
            markup: Some(buffers.markup.clone()),
            style: Some(buffers.style.clone()),
            script: Some(buffers.script.clone()),
            ..ProjectDraft::default()
        }
    }

    /// Targets an existing project instead of creating one.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }
}

/// Record of a generated image, as stored alongside projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub prompt: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Builds a record from a generation result.
    pub fn from_generated(image: &GeneratedImage, project_id: Option<Uuid>) -> Self {
        ImageRecord {
            prompt: image.prompt.clone(),
            image_url: image.image_url.clone(),
            project_id,
            owner_id: None,
            created_at: image.generated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Landing page".to_string(),
            markup: "<h1>Hi</h1>".to_string(),
            style: "h1 { color: teal; }".to_string(),
            script: "console.log('hi');".to_string(),
            description: None,
            is_public: false,
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_project_serializes_wire_column_names() {
        let json = serde_json::to_string(&sample_project()).unwrap();
        assert!(json.contains("\"html_code\""));
        assert!(json.contains("\"css_code\""));
        assert!(json.contains("\"js_code\""));
        assert!(!json.contains("\"markup\""));
        // Unset owner is omitted entirely.
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_project_buffers_round_trip() {
        let project = sample_project();
        let buffers = project.buffers();
        assert_eq!(buffers.markup, project.markup);
        assert_eq!(buffers.style, project.style);
        assert_eq!(buffers.script, project.script);
    }

    #[test]
    fn test_draft_from_buffers_fills_only_code_fields() {
        let buffers = SourceBuffers::from_parts("<p>a</p>", "p {}", "f();");
        let draft = ProjectDraft::from_buffers(&buffers);
        assert_eq!(draft.markup.as_deref(), Some("<p>a</p>"));
        assert!(draft.id.is_none());
        assert!(draft.title.is_none());

        let json = serde_json::to_string(&draft).unwrap();
        assert!(json.contains("\"html_code\""));
        assert!(!json.contains("\"title\""));
    }

    #[test]
    fn test_image_record_from_generated() {
        let image = GeneratedImage {
            image_url: "https://picsum.photos/800/600?random=1".to_string(),
            prompt: "a logo".to_string(),
            generated_at: Utc::now(),
        };
        let project_id = Uuid::new_v4();
        let record = ImageRecord::from_generated(&image, Some(project_id));
        assert_eq!(record.image_url, image.image_url);
        assert_eq!(record.project_id, Some(project_id));
        assert_eq!(record.created_at, image.generated_at);
    }
}
