//! Editing sessions.
//!
//! An [`EditorSession`] owns the three source buffers, a render scheduler,
//! and a render surface. Edits flow in, composed documents flow out:
//!
//! ```text
//! edit(kind, text) -> buffers -> scheduler -> compose -> surface.reload()
//! ```
//!
//! With the default immediate scheduler every edit re-renders the preview
//! synchronously. A debounced session coalesces bursts of edits and renders
//! on [`EditorSession::tick`] once the quiet window has passed.

pub mod buffer;
pub mod render;
pub mod scheduler;

pub use buffer::{BufferKind, SourceBuffers};
pub use render::{FileSurface, HeadlessSurface, RenderSurface};
pub use scheduler::RenderScheduler;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::compose::compose;
use crate::error::{Result, TriptychError};

/// File name used when exporting the composed document.
pub const EXPORT_FILENAME: &str = "triptych_output.html";

/// A live editing session over the three panes.
pub struct EditorSession {
    buffers: SourceBuffers,
    scheduler: RenderScheduler,
    surface: Box<dyn RenderSurface>,
    last_rendered: Option<String>,
    renders: u64,
}

impl EditorSession {
    /// Creates a session with the starter project and an immediate
    /// scheduler, and renders the initial preview.
    pub fn new(surface: Box<dyn RenderSurface>) -> Result<Self> {
        Self::with_scheduler(surface, RenderScheduler::immediate())
    }

    /// Creates a session whose renders wait for `window` of quiet after
    /// the last edit.
    pub fn with_debounce(surface: Box<dyn RenderSurface>, window: Duration) -> Result<Self> {
        Self::with_scheduler(surface, RenderScheduler::debounced(window))
    }

    /// Creates a session with an explicit scheduler.
    pub fn with_scheduler(
        surface: Box<dyn RenderSurface>,
        scheduler: RenderScheduler,
    ) -> Result<Self> {
        let mut session = EditorSession {
            buffers: SourceBuffers::new(),
            scheduler,
            surface,
            last_rendered: None,
            renders: 0,
        };
        session.render_now()?;
        Ok(session)
    }

    /// Current buffer contents.
    pub fn buffers(&self) -> &SourceBuffers {
        &self.buffers
    }

    /// The document from the most recent render.
    pub fn composed(&self) -> Option<&str> {
        self.last_rendered.as_deref()
    }

    /// True while an edit has not yet been rendered.
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Number of renders pushed to the surface so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Replaces one pane and schedules a render. Returns whether the
    /// render happened now.
    pub fn edit(&mut self, kind: BufferKind, text: impl Into<String>) -> Result<bool> {
        self.edit_at(kind, text, Instant::now())
    }

    /// Like [`EditorSession::edit`] with an explicit clock, for
    /// deterministic scheduling tests.
    pub fn edit_at(
        &mut self,
        kind: BufferKind,
        text: impl Into<String>,
        now: Instant,
    ) -> Result<bool> {
        self.buffers.set(kind, text.into());
        self.scheduler.mark_dirty(now);
        self.render_if_due(now)
    }

    /// Replaces all three panes at once and schedules a single render.
    pub fn load(
        &mut self,
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Result<bool> {
        self.buffers = SourceBuffers::from_parts(markup, style, script);
        log::info!("Loaded project into session");
        let now = Instant::now();
        self.scheduler.mark_dirty(now);
        self.render_if_due(now)
    }

    /// Applies generated code to one pane, replacing its contents.
    pub fn apply_generated(&mut self, kind: BufferKind, code: impl Into<String>) -> Result<bool> {
        let code = code.into();
        log::info!("Applying {} generated characters to {} pane", code.len(), kind);
        self.edit(kind, code)
    }

    /// Renders if a scheduled render has come due. Returns whether a
    /// render happened.
    pub fn tick(&mut self) -> Result<bool> {
        self.tick_at(Instant::now())
    }

    /// Like [`EditorSession::tick`] with an explicit clock.
    pub fn tick_at(&mut self, now: Instant) -> Result<bool> {
        self.render_if_due(now)
    }

    /// Renders any pending edit immediately, ignoring the quiet window.
    pub fn flush(&mut self) -> Result<bool> {
        if self.scheduler.flush() {
            self.render_now()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Composes the current buffers and pushes the document to the
    /// surface unconditionally.
    pub fn render_now(&mut self) -> Result<&str> {
        let document = compose(&self.buffers.markup, &self.buffers.style, &self.buffers.script);
        self.surface.reload(&document)?;
        self.renders += 1;
        self.scheduler.flush();
        log::debug!(
            "Rendered {} bytes to {} surface (render #{})",
            document.len(),
            self.surface.name(),
            self.renders
        );
        self.last_rendered = Some(document);
        Ok(self.last_rendered.as_deref().unwrap_or(""))
    }

    /// Restores the starter project and re-renders.
    pub fn reset(&mut self) -> Result<()> {
        self.buffers.reset();
        log::info!("Session reset to starter project");
        self.render_now()?;
        Ok(())
    }

    /// Writes the composed document to `dir` and returns the file path.
    ///
    /// Uses the last rendered document when it is current, otherwise
    /// composes fresh from the buffers. The export never touches the
    /// render surface.
    pub fn export_to(&mut self, dir: &Path) -> Result<PathBuf> {
        let document = match (&self.last_rendered, self.scheduler.is_dirty()) {
            (Some(doc), false) => doc.clone(),
            _ => compose(&self.buffers.markup, &self.buffers.style, &self.buffers.script),
        };

        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| TriptychError::DirectoryCreateError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let path = dir.join(EXPORT_FILENAME);
        std::fs::write(&path, &document).map_err(|e| TriptychError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;
        log::info!("Exported {} bytes to {}", document.len(), path.display());
        Ok(path)
    }

    fn render_if_due(&mut self, now: Instant) -> Result<bool> {
        if self.scheduler.poll(now) {
            self.render_now()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
