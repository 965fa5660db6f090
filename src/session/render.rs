//! Render surfaces that receive composed preview documents.

use std::path::{Path, PathBuf};

use crate::error::{Result, TriptychError};

/// A destination for composed preview documents.
///
/// The session pushes the full document on every render; surfaces replace
/// whatever they showed before. Implementations decide what "showing" means:
/// an in-memory record for tests, a file another process watches, and so on.
pub trait RenderSurface: Send {
    /// Replaces the surface contents with a freshly composed document.
    fn reload(&mut self, document: &str) -> Result<()>;

    /// Short name used in log output.
    fn name(&self) -> &str {
        "surface"
    }
}

/// In-memory surface that records every document it was asked to show.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    history: Vec<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        HeadlessSurface::default()
    }

    /// The most recently rendered document, if any.
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(|doc| doc.as_str())
    }

    /// Number of reloads performed so far.
    pub fn reload_count(&self) -> usize {
        self.history.len()
    }

    /// Every document rendered so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl RenderSurface for HeadlessSurface {
    fn reload(&mut self, document: &str) -> Result<()> {
        self.history.push(document.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "headless"
    }
}

/// Surface that writes each rendered document to a file on disk.
///
/// Pointing a browser at the file gives a live preview: every reload
/// rewrites the file in place.
#[derive(Debug)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSurface { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RenderSurface for FileSurface {
    fn reload(&mut self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    TriptychError::DirectoryCreateError {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }
        std::fs::write(&self.path, document).map_err(|e| TriptychError::FileWriteError {
            path: self.path.clone(),
            source: e,
        })?;
        log::debug!("Rendered {} bytes to {}", document.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
