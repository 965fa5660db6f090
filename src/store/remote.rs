//! Project stores.
//!
//! The [`ProjectStore`] trait is the persistence seam: an in-memory store
//! backs tests and offline work, and a REST store speaks PostgREST to the
//! hosted backend when the `supabase` feature is compiled in.

use std::env;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, TriptychError};
use crate::store::project::{ImageRecord, Project, ProjectDraft, DEFAULT_TITLE};

/// Default REST request timeout in milliseconds.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;

/// Backend for saved projects and image records.
pub trait ProjectStore: Send + Sync {
    /// All projects, most recently updated first.
    fn list(&self) -> Result<Vec<Project>>;

    /// A single project by id.
    fn fetch(&self, id: Uuid) -> Result<Project>;

    /// Creates a project (draft without id) or applies the draft's present
    /// fields to an existing one (draft with id). Returns the stored row.
    fn save(&self, draft: &ProjectDraft) -> Result<Project>;

    /// Deletes a project. Unknown ids are an error.
    fn delete(&self, id: Uuid) -> Result<()>;

    /// Records a generated image.
    fn record_image(&self, record: &ImageRecord) -> Result<()>;

    /// Whether the store can currently serve requests.
    fn is_available(&self) -> bool {
        true
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| TriptychError::Internal("project store mutex poisoned".to_string()))
}

/// In-memory store for tests and offline sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Mutex<Vec<Project>>,
    images: Mutex<Vec<ImageRecord>>,
    owner: Option<Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store whose new projects are stamped with `owner`.
    pub fn with_owner(owner: Uuid) -> Self {
        MemoryStore {
            owner: Some(owner),
            ..MemoryStore::default()
        }
    }

    /// Recorded images, oldest first.
    pub fn image_records(&self) -> Result<Vec<ImageRecord>> {
        Ok(lock(&self.images)?.clone())
    }
}

impl ProjectStore for MemoryStore {
    fn list(&self) -> Result<Vec<Project>> {
        let mut projects = lock(&self.projects)?.clone();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    fn fetch(&self, id: Uuid) -> Result<Project> {
        lock(&self.projects)?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| TriptychError::ProjectNotFound { id: id.to_string() })
    }

    fn save(&self, draft: &ProjectDraft) -> Result<Project> {
        let mut projects = lock(&self.projects)?;
        if let Some(id) = draft.id {
            let project = projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| TriptychError::ProjectNotFound { id: id.to_string() })?;
            if let Some(title) = &draft.title {
                project.title = title.clone();
            }
            if let Some(markup) = &draft.markup {
                project.markup = markup.clone();
            }
            if let Some(style) = &draft.style {
                project.style = style.clone();
            }
            if let Some(script) = &draft.script {
                project.script = script.clone();
            }
            if let Some(description) = &draft.description {
                project.description = Some(description.clone());
            }
            if let Some(is_public) = draft.is_public {
                project.is_public = is_public;
            }
            project.updated_at = Utc::now();
            Ok(project.clone())
        } else {
            let now = Utc::now();
            let project = Project {
                id: Uuid::new_v4(),
                title: draft
                    .title
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                markup: draft.markup.clone().unwrap_or_default(),
                style: draft.style.clone().unwrap_or_default(),
                script: draft.script.clone().unwrap_or_default(),
                description: draft.description.clone(),
                is_public: draft.is_public.unwrap_or(false),
                owner_id: self.owner,
                created_at: now,
                updated_at: now,
            };
            projects.push(project.clone());
            Ok(project)
        }
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut projects = lock(&self.projects)?;
        let index = projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| TriptychError::ProjectNotFound { id: id.to_string() })?;
        projects.remove(index);
        Ok(())
    }

    fn record_image(&self, record: &ImageRecord) -> Result<()> {
        lock(&self.images)?.push(record.clone());
        Ok(())
    }
}

/// Store backed by a PostgREST endpoint.
///
/// Talks to the `projects` and `generated_images` tables with the anon key
/// in both the `apikey` and `Authorization` headers. Compiled to stubs
/// without the `supabase` feature.
#[derive(Debug)]
pub struct RestStore {
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl RestStore {
    /// Creates a store from `TRIPTYCH_STORE_URL`, `TRIPTYCH_STORE_KEY`,
    /// and optionally `TRIPTYCH_STORE_TIMEOUT_MS`.
    pub fn new() -> Result<Self> {
        let base_url = env::var("TRIPTYCH_STORE_URL").map_err(|_| {
            TriptychError::StoreUnavailable {
                reason: "TRIPTYCH_STORE_URL is not set".to_string(),
            }
        })?;
        let api_key = env::var("TRIPTYCH_STORE_KEY").map_err(|_| {
            TriptychError::StoreUnavailable {
                reason: "TRIPTYCH_STORE_KEY is not set".to_string(),
            }
        })?;
        let timeout_ms = env::var("TRIPTYCH_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);
        Ok(Self::with_config(base_url, api_key, timeout_ms))
    }

    /// Creates a store with explicit settings.
    pub fn with_config(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        RestStore {
            base_url,
            api_key: api_key.into(),
            timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(feature = "supabase")]
impl RestStore {
    fn client(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| TriptychError::StoreUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
            })
    }

    fn execute(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response> {
        let response = request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TriptychError::StoreUnavailable {
                        reason: format!("request timed out after {}ms", self.timeout_ms),
                    }
                } else if e.is_connect() {
                    TriptychError::StoreUnavailable {
                        reason: format!("Cannot reach project store: {}", e),
                    }
                } else {
                    TriptychError::StoreUnavailable {
                        reason: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            log::error!("Project store error {}: {}", status, message);
            return Err(TriptychError::StoreStatus {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    fn rows(response: reqwest::blocking::Response) -> Result<Vec<Project>> {
        response
            .json()
            .map_err(|e| TriptychError::InvalidStoreResponse {
                reason: format!("Malformed JSON: {}", e),
            })
    }

    fn update_body(draft: &ProjectDraft) -> serde_json::Map<String, serde_json::Value> {
        let mut body = serde_json::Map::new();
        if let Some(title) = &draft.title {
            body.insert("title".to_string(), serde_json::json!(title));
        }
        if let Some(markup) = &draft.markup {
            body.insert("html_code".to_string(), serde_json::json!(markup));
        }
        if let Some(style) = &draft.style {
            body.insert("css_code".to_string(), serde_json::json!(style));
        }
        if let Some(script) = &draft.script {
            body.insert("js_code".to_string(), serde_json::json!(script));
        }
        if let Some(description) = &draft.description {
            body.insert("description".to_string(), serde_json::json!(description));
        }
        if let Some(is_public) = draft.is_public {
            body.insert("is_public".to_string(), serde_json::json!(is_public));
        }
        body
    }
}

#[cfg(feature = "supabase")]
impl ProjectStore for RestStore {
    fn list(&self) -> Result<Vec<Project>> {
        let url = format!(
            "{}/projects?select=*&order=updated_at.desc",
            self.base_url
        );
        log::debug!("GET {}", url);
        let response = self.execute(self.client()?.get(&url))?;
        Self::rows(response)
    }

    fn fetch(&self, id: Uuid) -> Result<Project> {
        let url = format!("{}/projects?id=eq.{}&select=*", self.base_url, id);
        log::debug!("GET {}", url);
        let response = self.execute(self.client()?.get(&url))?;
        Self::rows(response)?
            .into_iter()
            .next()
            .ok_or_else(|| TriptychError::ProjectNotFound { id: id.to_string() })
    }

    fn save(&self, draft: &ProjectDraft) -> Result<Project> {
        if let Some(id) = draft.id {
            let body = Self::update_body(draft);
            if body.is_empty() {
                return self.fetch(id);
            }
            let url = format!("{}/projects?id=eq.{}", self.base_url, id);
            log::debug!("PATCH {}", url);
            let response = self.execute(
                self.client()?
                    .patch(&url)
                    .header("Prefer", "return=representation")
                    .json(&serde_json::Value::Object(body)),
            )?;
            Self::rows(response)?
                .into_iter()
                .next()
                .ok_or_else(|| TriptychError::ProjectNotFound { id: id.to_string() })
        } else {
            let body = serde_json::json!({
                "title": draft.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                "html_code": draft.markup.clone().unwrap_or_default(),
                "css_code": draft.style.clone().unwrap_or_default(),
                "js_code": draft.script.clone().unwrap_or_default(),
                "description": draft.description,
                "is_public": draft.is_public.unwrap_or(false),
            });
            let url = format!("{}/projects", self.base_url);
            log::debug!("POST {}", url);
            let response = self.execute(
                self.client()?
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .json(&body),
            )?;
            Self::rows(response)?.into_iter().next().ok_or_else(|| {
                TriptychError::InvalidStoreResponse {
                    reason: "no row returned for created project".to_string(),
                }
            })
        }
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let url = format!("{}/projects?id=eq.{}", self.base_url, id);
        log::debug!("DELETE {}", url);
        let response = self.execute(
            self.client()?
                .delete(&url)
                .header("Prefer", "return=representation"),
        )?;
        let deleted = Self::rows(response)?;
        if deleted.is_empty() {
            return Err(TriptychError::ProjectNotFound { id: id.to_string() });
        }
        Ok(())
    }

    fn record_image(&self, record: &ImageRecord) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert("prompt".to_string(), serde_json::json!(record.prompt));
        body.insert(
            "image_url".to_string(),
            serde_json::json!(record.image_url),
        );
        if let Some(project_id) = record.project_id {
            body.insert("project_id".to_string(), serde_json::json!(project_id));
        }
        if let Some(owner_id) = record.owner_id {
            body.insert("user_id".to_string(), serde_json::json!(owner_id));
        }

        let url = format!("{}/generated_images", self.base_url);
        log::debug!("POST {}", url);
        self.execute(
            self.client()?
                .post(&url)
                .json(&serde_json::Value::Object(body)),
        )?;
        Ok(())
    }
}

#[cfg(not(feature = "supabase"))]
impl ProjectStore for RestStore {
    fn list(&self) -> Result<Vec<Project>> {
        Err(TriptychError::StoreNotCompiled)
    }

    fn fetch(&self, _id: Uuid) -> Result<Project> {
        Err(TriptychError::StoreNotCompiled)
    }

    fn save(&self, _draft: &ProjectDraft) -> Result<Project> {
        Err(TriptychError::StoreNotCompiled)
    }

    fn delete(&self, _id: Uuid) -> Result<()> {
        Err(TriptychError::StoreNotCompiled)
    }

    fn record_image(&self, _record: &ImageRecord) -> Result<()> {
        Err(TriptychError::StoreNotCompiled)
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_applies_defaults() {
        let store = MemoryStore::new();
        let project = store.save(&ProjectDraft::new()).unwrap();
        assert_eq!(project.title, DEFAULT_TITLE);
        assert_eq!(project.markup, "");
        assert!(!project.is_public);
        assert!(project.owner_id.is_none());
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_create_stamps_owner() {
        let owner = Uuid::new_v4();
        let store = MemoryStore::with_owner(owner);
        let project = store.save(&ProjectDraft::new()).unwrap();
        assert_eq!(project.owner_id, Some(owner));
    }

    #[test]
    fn test_update_touches_only_present_fields() {
        let store = MemoryStore::new();
        let created = store
            .save(
                &ProjectDraft::new()
                    .with_title("Original")
                    .with_description("first draft"),
            )
            .unwrap();

        let updated = store
            .save(&ProjectDraft::new().with_id(created.id).with_title("Renamed"))
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description.as_deref(), Some("first draft"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let store = MemoryStore::new();
        let err = store
            .save(&ProjectDraft::new().with_id(Uuid::new_v4()))
            .unwrap_err();
        assert_eq!(err.error_code(), "PROJECT_NOT_FOUND");
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let store = MemoryStore::new();
        let err = store.delete(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "PROJECT_NOT_FOUND");
    }

    #[test]
    fn test_rest_store_normalizes_base_url() {
        let store = RestStore::with_config("https://example.test/rest/v1///", "key", 1_000);
        assert_eq!(store.base_url(), "https://example.test/rest/v1");
        assert_eq!(store.timeout_ms(), 1_000);
        assert!(store.has_api_key());
    }

    #[cfg(not(feature = "supabase"))]
    #[test]
    fn test_rest_store_without_feature_is_stubbed() {
        let store = RestStore::with_config("https://example.test/rest/v1", "key", 1_000);
        assert!(!store.is_available());
        let err = store.list().unwrap_err();
        assert_eq!(err.error_code(), "STORE_NOT_COMPILED");
    }
}
