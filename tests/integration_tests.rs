//! Integration Tests
//!
//! End-to-end tests for the Triptych playground pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use triptych::compose::compose;
use triptych::config::Config;
use triptych::generate::{GenerationBridge, MockProvider};
use triptych::session::{
    BufferKind, EditorSession, FileSurface, HeadlessSurface, SourceBuffers, EXPORT_FILENAME,
};
use triptych::store::SnapshotManager;

/// Helper to build a session that renders into memory.
fn headless_session() -> Result<EditorSession> {
    Ok(EditorSession::new(Box::new(HeadlessSurface::new()))?)
}

// === Full Pipeline Tests ===

#[test]
fn test_edit_compose_render_flow() -> Result<()> {
    let mut session = headless_session()?;

    session.edit(
        BufferKind::Markup,
        "<html><head></head><body><main></main></body></html>",
    )?;
    session.edit(BufferKind::Style, "main { padding: 2rem; }")?;
    session.edit(BufferKind::Script, "document.title = 'ready';")?;

    let document = session.composed().unwrap();
    assert!(document.contains("<style>main { padding: 2rem; }</style></head>"));
    assert!(document.contains("<script>document.title = 'ready';</script></body>"));

    // Starter render plus three immediate edit renders.
    assert_eq!(session.render_count(), 4);
    Ok(())
}

#[test]
fn test_anchored_markup_places_blocks_at_anchors() {
    let doc = compose(
        "<html><head></head><body></body></html>",
        "body{color:red}",
        "console.log(1)",
    );

    assert_eq!(
        doc,
        "<html><head><style>body{color:red}</style></head>\
         <body><script>console.log(1)</script></body></html>"
    );
}

#[test]
fn test_empty_markup_still_yields_both_blocks() {
    let doc = compose("", "a{}", "b()");
    assert_eq!(doc, "<style>a{}</style><script>b()</script>");
}

#[test]
fn test_debounced_session_coalesces_bursts() -> Result<()> {
    let mut session = EditorSession::with_debounce(
        Box::new(HeadlessSurface::new()),
        Duration::from_millis(300),
    )?;
    let start = Instant::now();

    for i in 0..10 {
        session.edit_at(
            BufferKind::Script,
            format!("let revision = {};", i),
            start + Duration::from_millis(i * 20),
        )?;
    }
    assert_eq!(session.render_count(), 1);

    // One render once the quiet window after the last edit passes.
    let rendered = session.tick_at(start + Duration::from_millis(600))?;
    assert!(rendered);
    assert_eq!(session.render_count(), 2);
    assert!(session.composed().unwrap().contains("let revision = 9;"));
    Ok(())
}

// === Render Surface Tests ===

#[test]
fn test_file_surface_writes_preview() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let preview = dir.path().join("preview.html");
    let mut session = EditorSession::new(Box::new(FileSurface::new(&preview)))?;

    session.edit(BufferKind::Markup, "<p>on disk</p>")?;

    let contents = std::fs::read_to_string(&preview)?;
    assert!(contents.contains("<p>on disk</p>"));
    Ok(())
}

// === Export Tests ===

#[test]
fn test_export_roundtrip() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut session = headless_session()?;
    session.edit(BufferKind::Markup, "<h1>Exported</h1>")?;

    let path = session.export_to(dir.path())?;
    assert!(path.ends_with(EXPORT_FILENAME));

    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents, session.composed().unwrap());
    Ok(())
}

// === Snapshot and Recovery Tests ===

#[test]
fn test_snapshot_recover_roundtrip() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut manager = SnapshotManager::new(dir.path());

    let buffers = SourceBuffers::from_parts(
        "<p>work in progress</p>",
        "p { color: teal; }",
        "console.log('wip');",
    );
    manager.snapshot(&buffers)?;

    let recovered = SnapshotManager::recover_latest(dir.path())?;
    assert_eq!(recovered.buffers, buffers);

    // A recovered snapshot can seed a fresh session.
    let mut session = headless_session()?;
    session.load(
        recovered.buffers.markup,
        recovered.buffers.style,
        recovered.buffers.script,
    )?;
    assert!(session
        .composed()
        .unwrap()
        .contains("<p>work in progress</p>"));
    Ok(())
}

#[test]
fn test_recover_from_empty_dir_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = SnapshotManager::recover_latest(dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "NO_SNAPSHOT_FOUND");
}

// === Config Tests ===

#[test]
fn test_config_roundtrip_with_custom_path() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.set_api_key("AIzaSyTest1234567890");
    config.debounce_ms = 250;
    config.save_to(&path)?;

    let loaded = Config::load_from(&path)?;
    assert_eq!(loaded.api_key(), Some("AIzaSyTest1234567890"));
    assert_eq!(loaded.debounce_ms, 250);
    assert_eq!(loaded.masked_api_key(), "AIza****90");
    Ok(())
}

#[test]
fn test_config_missing_file_yields_defaults() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let config = Config::load_from(&dir.path().join("nope.json"))?;
    assert_eq!(config, Config::default());
    Ok(())
}

// === Offline Generation Tests ===

#[test]
fn test_generated_code_flows_into_session() -> Result<()> {
    let mut session = headless_session()?;
    let mut bridge =
        GenerationBridge::new(Arc::new(MockProvider::new())).with_credential("offline-key");

    let current = session.buffers().get(BufferKind::Style).to_string();
    let code = bridge.generate_code("style the landing page", BufferKind::Style, &current)?;
    session.apply_generated(BufferKind::Style, code)?;

    let document = session.composed().unwrap();
    assert!(document.contains("/* AI generated: style the landing page */"));
    // The previous pane contents survive inside the generated result.
    assert!(document.contains(current.as_str()));
    Ok(())
}

#[test]
fn test_generation_without_credential_leaves_buffers_untouched() {
    let mut session = headless_session().unwrap();
    let provider = Arc::new(MockProvider::new());
    let mut bridge = GenerationBridge::new(provider.clone());

    let before = session.buffers().get(BufferKind::Style).to_string();
    let err = bridge
        .generate_code("dark theme", BufferKind::Style, &before)
        .unwrap_err();

    assert_eq!(err.error_code(), "MISSING_CREDENTIAL");
    assert_eq!(session.buffers().get(BufferKind::Style), before);
    assert_eq!(provider.calls(), 0);
}
