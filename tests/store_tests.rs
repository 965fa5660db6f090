//! Store Tests
//!
//! Tests for the project wire format and for behavior that crosses the
//! store and cache layers.

use std::sync::Arc;

use triptych::generate::GeneratedImage;
use triptych::session::SourceBuffers;
use triptych::store::{
    ImageRecord, MemoryStore, Project, ProjectCache, ProjectDraft, ProjectStore,
};

// === Wire Format Tests ===

#[test]
fn test_project_round_trips_through_store_columns() {
    let row = serde_json::json!({
        "id": "550e8400-e29b-41d4-a716-446655440000",
        "title": "Landing page",
        "html_code": "<h1>Hi</h1>",
        "css_code": "h1 { color: blue; }",
        "js_code": "console.log('hi');",
        "is_public": true,
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-02-01T08:00:00Z"
    });

    let project: Project = serde_json::from_value(row).unwrap();
    assert_eq!(project.markup, "<h1>Hi</h1>");
    assert!(project.is_public);
    assert!(project.description.is_none());
    assert!(project.owner_id.is_none());

    let json = serde_json::to_string(&project).unwrap();
    assert!(json.contains("\"html_code\""));
    assert!(json.contains("\"css_code\""));
    assert!(json.contains("\"js_code\""));
    assert!(!json.contains("\"markup\""));
}

#[test]
fn test_empty_draft_serializes_to_empty_object() {
    let draft = ProjectDraft::new();
    assert_eq!(serde_json::to_value(&draft).unwrap(), serde_json::json!({}));
}

#[test]
fn test_draft_from_buffers_carries_only_code_columns() {
    let buffers = SourceBuffers::from_parts("<p>a</p>", "p{}", "f()");
    let draft = ProjectDraft::from_buffers(&buffers);
    let value = serde_json::to_value(&draft).unwrap();

    assert_eq!(value["html_code"], "<p>a</p>");
    assert_eq!(value["css_code"], "p{}");
    assert_eq!(value["js_code"], "f()");
    assert!(value.get("title").is_none());
    assert!(value.get("id").is_none());
}

// === Store Ordering Tests ===

#[test]
fn test_list_is_newest_first() {
    let store = MemoryStore::new();
    let a = store.save(&ProjectDraft::new().with_title("A")).unwrap();
    store.save(&ProjectDraft::new().with_title("B")).unwrap();

    // Touch A so it becomes the most recent.
    store
        .save(&ProjectDraft::new().with_id(a.id).with_title("A2"))
        .unwrap();

    let titles: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["A2".to_string(), "B".to_string()]);
}

#[test]
fn test_record_image_appends() {
    let store = MemoryStore::new();
    let image = GeneratedImage {
        image_url: "https://picsum.photos/800/600?random=1".to_string(),
        prompt: "a skyline".to_string(),
        generated_at: chrono::Utc::now(),
    };

    store
        .record_image(&ImageRecord::from_generated(&image, None))
        .unwrap();

    let records = store.image_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prompt, "a skyline");
}

// === Cache and Store Interplay Tests ===

#[test]
fn test_autosave_persists_code_columns_to_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut cache = ProjectCache::new(store.clone());
    let project = cache
        .save(&ProjectDraft::new().with_title("Keep me"))
        .unwrap();

    let buffers = SourceBuffers::from_parts("<p>new</p>", "p{}", "g()");
    assert!(cache.autosave_buffers(&buffers).unwrap());

    // The store row took the buffers without losing its title.
    let stored = store.fetch(project.id).unwrap();
    assert_eq!(stored.markup, "<p>new</p>");
    assert_eq!(stored.style, "p{}");
    assert_eq!(stored.title, "Keep me");
}

#[test]
fn test_set_current_requires_cached_project() {
    let store = Arc::new(MemoryStore::new());
    let elsewhere = store.save(&ProjectDraft::new()).unwrap();

    let mut cache = ProjectCache::new(store);
    // Not refreshed yet, so the project is unknown to the cache.
    let err = cache.set_current(elsewhere.id).unwrap_err();
    assert_eq!(err.error_code(), "PROJECT_NOT_FOUND");

    cache.refresh().unwrap();
    assert!(cache.set_current(elsewhere.id).is_ok());
}
