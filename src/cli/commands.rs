//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;

use crate::compose::{compose, is_complete_document};
use crate::config::Config;
use crate::error::{Result, TriptychError};
use crate::generate::{default_provider, suggested_prompts, GenerationBridge, GenerationTarget};
use crate::session::{BufferKind, EditorSession, FileSurface, HeadlessSurface, SourceBuffers};
use crate::store::{
    ImageRecord, ProjectCache, ProjectDraft, ProjectStore, RestStore, SnapshotManager,
    DEFAULT_STORE_TIMEOUT_MS,
};

/// Read one pane from a file, or fall back to its starter template.
fn read_pane(path: Option<&Path>, kind: BufferKind) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).map_err(|e| TriptychError::FileReadError {
            path: p.to_path_buf(),
            source: e,
        }),
        None => Ok(SourceBuffers::new().get(kind).to_string()),
    }
}

fn read_buffers(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
) -> Result<SourceBuffers> {
    Ok(SourceBuffers::from_parts(
        read_pane(markup, BufferKind::Markup)?,
        read_pane(style, BufferKind::Style)?,
        read_pane(script, BufferKind::Script)?,
    ))
}

fn parse_project_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| TriptychError::ProjectNotFound { id: id.to_string() })
}

fn remote_store(config: &Config) -> Result<RestStore> {
    match (config.store_url.as_deref(), config.store_key.as_deref()) {
        (Some(url), Some(key)) => Ok(RestStore::with_config(url, key, DEFAULT_STORE_TIMEOUT_MS)),
        _ => Err(TriptychError::StoreUnavailable {
            reason: "store URL and key are not configured".to_string(),
        }),
    }
}

fn open_bridge(config: &Config) -> GenerationBridge {
    let mut bridge = GenerationBridge::new(default_provider());
    bridge.set_credential(config.api_key().map(str::to_string));
    bridge
}

fn print_failure(what: &str, e: &TriptychError) {
    println!("ERROR: {} failed", what);
    println!("{}", e.friendly_message());
    for suggestion in e.recovery_suggestions() {
        println!("  - {}", suggestion);
    }
}

/// Compose pane files into a single document.
pub fn compose_document(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    info!("Composing document");

    let buffers = read_buffers(markup, style, script)?;
    let document = compose(&buffers.markup, &buffers.style, &buffers.script);

    match out {
        Some(path) => {
            fs::write(path, &document).map_err(|e| TriptychError::FileWriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
            println!("Document written: {}", path.display());
            println!("Size: {} bytes", document.len());
        }
        None => println!("{}", document),
    }

    Ok(())
}

/// Render pane files to a preview file through an editing session.
pub fn preview(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
    out: &Path,
) -> Result<()> {
    info!("Rendering preview to: {}", out.display());

    let buffers = read_buffers(markup, style, script)?;
    let mut session = EditorSession::new(Box::new(FileSurface::new(out)))?;
    session.load(buffers.markup, buffers.style, buffers.script)?;

    println!("Preview written: {}", out.display());

    Ok(())
}

/// Generate code for one pane from a prompt.
pub fn generate(
    target: &str,
    prompt: &str,
    current: Option<&Path>,
    apply: Option<&Path>,
) -> Result<()> {
    info!("Generating {} code for prompt: {}", target, prompt);

    let kind = BufferKind::parse(target)?;
    let current_code = match current {
        Some(p) => fs::read_to_string(p).map_err(|e| TriptychError::FileReadError {
            path: p.to_path_buf(),
            source: e,
        })?,
        None => String::new(),
    };

    let config = Config::load()?;
    let mut bridge = open_bridge(&config);
    let provider = bridge.provider_info();

    println!("=== Triptych Generator ===");
    println!("Provider: {} v{}", provider.name, provider.version);
    println!("Target: {} pane", kind);
    println!("Prompt: \"{}\"", prompt);
    println!();
    println!("Generating...");

    match bridge.generate_code(prompt, kind, &current_code) {
        Ok(code) => match apply {
            Some(path) => {
                fs::write(path, &code).map_err(|e| TriptychError::FileWriteError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                println!("Generated code written: {}", path.display());
            }
            None => {
                println!();
                println!("{}", code);
            }
        },
        Err(e) => print_failure("Generation", &e),
    }

    Ok(())
}

/// Generate an image record for a prompt.
pub fn generate_image(prompt: &str, project: Option<&str>) -> Result<()> {
    info!("Generating image for prompt: {}", prompt);

    let project_id = match project {
        Some(raw) => Some(parse_project_id(raw)?),
        None => None,
    };

    let config = Config::load()?;
    let mut bridge = open_bridge(&config);

    match bridge.generate_image(prompt, project_id) {
        Ok(image) => {
            println!("Image URL: {}", image.image_url);
            println!(
                "Generated at: {}",
                image.generated_at.format("%Y-%m-%d %H:%M:%S")
            );

            // Image records are best effort, the URL above is the result.
            if let Ok(store) = remote_store(&config) {
                let record = ImageRecord::from_generated(&image, project_id);
                if let Err(e) = store.record_image(&record) {
                    warn!("Image record not persisted: {}", e);
                }
            }
        }
        Err(e) => print_failure("Image generation", &e),
    }

    Ok(())
}

/// List stored projects, newest first.
pub fn list_projects() -> Result<()> {
    info!("Listing stored projects");

    let config = Config::load()?;
    let mut cache = ProjectCache::new(Arc::new(remote_store(&config)?));
    cache.refresh()?;

    if cache.is_empty() {
        println!("No projects stored.");
        return Ok(());
    }

    println!("Projects:");
    println!("{:-<72}", "");
    for project in cache.projects() {
        let visibility = match project.is_public {
            true => "public",
            false => "private",
        };
        println!(
            "{}  {:<24}  {}  (updated {})",
            project.id,
            project.title,
            visibility,
            project.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("{:-<72}", "");
    println!("{} project(s)", cache.len());

    Ok(())
}

/// Fetch and print one stored project.
pub fn show_project(id: &str) -> Result<()> {
    info!("Showing project: {}", id);

    let config = Config::load()?;
    let store = remote_store(&config)?;
    let project = store.fetch(parse_project_id(id)?)?;

    let json = serde_json::to_string_pretty(&project)?;
    println!("{}", json);

    Ok(())
}

/// Save pane files as a new or existing project.
pub fn save_project(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
    title: Option<&str>,
    description: Option<&str>,
    id: Option<&str>,
    public: bool,
) -> Result<()> {
    info!("Saving project");

    let buffers = read_buffers(markup, style, script)?;
    let mut draft = ProjectDraft::from_buffers(&buffers);
    if let Some(title) = title {
        draft = draft.with_title(title);
    }
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    if let Some(id) = id {
        draft = draft.with_id(parse_project_id(id)?);
    }
    if public {
        draft = draft.public(true);
    }

    let config = Config::load()?;
    let mut cache = ProjectCache::new(Arc::new(remote_store(&config)?));
    let project = cache.save(&draft)?;

    println!("Project saved: {}", project.id);
    println!("Title: {}", project.title);

    Ok(())
}

/// Delete a stored project.
pub fn delete_project(id: &str) -> Result<()> {
    info!("Deleting project: {}", id);

    let config = Config::load()?;
    let mut cache = ProjectCache::new(Arc::new(remote_store(&config)?));
    cache.delete(parse_project_id(id)?)?;

    println!("Project deleted: {}", id);

    Ok(())
}

/// Export the composed document into a directory.
pub fn export(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
    dir: &Path,
) -> Result<()> {
    info!("Exporting document to: {}", dir.display());

    let buffers = read_buffers(markup, style, script)?;
    let complete = is_complete_document(&buffers.markup);

    let mut session = EditorSession::new(Box::new(HeadlessSurface::new()))?;
    session.load(buffers.markup, buffers.style, buffers.script)?;
    let path = session.export_to(dir)?;

    println!("Exported: {}", path.display());
    match complete {
        true => println!("The markup was already a complete document."),
        false => println!("The markup is a fragment; style and script were attached around it."),
    }

    Ok(())
}

/// Write a snapshot of the pane files.
pub fn snapshot(
    markup: Option<&Path>,
    style: Option<&Path>,
    script: Option<&Path>,
    dir: Option<&Path>,
) -> Result<()> {
    let config = Config::load()?;
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => config.snapshot_dir(),
    };
    info!("Snapshotting panes to: {}", dir.display());

    let buffers = read_buffers(markup, style, script)?;
    let mut manager = SnapshotManager::new(dir);
    let path = manager.snapshot(&buffers)?;

    println!("Snapshot written: {}", path.display());

    Ok(())
}

/// Recover the latest snapshot, optionally writing the panes back out.
pub fn recover(dir: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let config = Config::load()?;
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => config.snapshot_dir(),
    };
    info!("Recovering latest snapshot from: {}", dir.display());

    let snapshots = SnapshotManager::list_snapshots(&dir)?;
    let snapshot = SnapshotManager::recover_latest(&dir)?;

    println!("Snapshots available: {}", snapshots.len());
    println!(
        "Recovered snapshot from: {}",
        snapshot.saved_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "Panes: markup {} bytes, style {} bytes, script {} bytes",
        snapshot.buffers.markup.len(),
        snapshot.buffers.style.len(),
        snapshot.buffers.script.len()
    );

    if let Some(out_dir) = out {
        if !out_dir.exists() {
            fs::create_dir_all(out_dir).map_err(|e| TriptychError::DirectoryCreateError {
                path: out_dir.to_path_buf(),
                source: e,
            })?;
        }

        let panes: [(&str, &str); 3] = [
            ("markup.html", &snapshot.buffers.markup),
            ("style.css", &snapshot.buffers.style),
            ("script.js", &snapshot.buffers.script),
        ];
        for (name, contents) in panes {
            let path = out_dir.join(name);
            fs::write(&path, contents).map_err(|e| TriptychError::FileWriteError {
                path: path.clone(),
                source: e,
            })?;
            println!("Wrote: {}", path.display());
        }
    }

    Ok(())
}

/// Print the suggested prompts for a generation target.
pub fn suggest(target: &str) -> Result<()> {
    let target = GenerationTarget::parse(target)?;

    println!("Suggested prompts for {}:", target);
    for prompt in suggested_prompts(target) {
        println!("  - {}", prompt);
    }

    Ok(())
}

/// Store the generation API key in the config file.
pub fn set_key(key: &str) -> Result<()> {
    info!("Storing generation API key");

    let mut config = match Config::default_path() {
        Some(path) => Config::load_from(&path)?,
        None => Config::default(),
    };
    config.set_api_key(key);
    let path = config.save()?;

    println!("API key stored: {}", config.masked_api_key());
    println!("Config file: {}", path.display());

    Ok(())
}

/// Print the effective configuration with the key masked.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("=== Triptych Configuration ===");
    match Config::default_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (no user config directory)"),
    }
    println!("API key: {}", config.masked_api_key());
    println!(
        "Store URL: {}",
        config.store_url.as_deref().unwrap_or("(not set)")
    );
    match config.store_key.is_some() {
        true => println!("Store key: (set)"),
        false => println!("Store key: (not set)"),
    }
    println!("Debounce: {} ms", config.debounce_ms);
    println!("Snapshot dir: {}", config.snapshot_dir().display());

    Ok(())
}
