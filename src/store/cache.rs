//! Local view over a project store.
//!
//! `ProjectCache` keeps the last successfully fetched project list, tracks
//! which project the session is working on, and applies remote-change
//! notifications by refreshing the whole list. When the store fails, the
//! cache keeps serving the last known good list.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Result, TriptychError};
use crate::session::SourceBuffers;
use crate::store::project::{Project, ProjectDraft};
use crate::store::remote::ProjectStore;

/// Callback invoked after a remote change has been applied.
pub type ChangeListener = Box<dyn Fn(&[Project]) + Send>;

/// Cached project list plus the current working project.
pub struct ProjectCache {
    store: Arc<dyn ProjectStore>,
    projects: Vec<Project>,
    current_id: Option<Uuid>,
    listeners: Vec<ChangeListener>,
}

impl ProjectCache {
    /// Creates an empty cache over `store`. Call
    /// [`ProjectCache::refresh`] to populate it.
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        ProjectCache {
            store,
            projects: Vec::new(),
            current_id: None,
            listeners: Vec::new(),
        }
    }

    /// The cached projects, most recently updated first.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// The project the session is currently working on, if it is still
    /// present in the cache.
    pub fn current(&self) -> Option<&Project> {
        self.current_id
            .and_then(|id| self.projects.iter().find(|p| p.id == id))
    }

    /// Binds the working project to one already in the cache.
    pub fn set_current(&mut self, id: Uuid) -> Result<&Project> {
        match self.projects.iter().position(|p| p.id == id) {
            Some(index) => {
                self.current_id = Some(id);
                Ok(&self.projects[index])
            }
            None => Err(TriptychError::ProjectNotFound { id: id.to_string() }),
        }
    }

    pub fn clear_current(&mut self) {
        self.current_id = None;
    }

    /// Replaces the cached list with a fresh fetch. On failure the cache
    /// is left untouched and the error is returned.
    pub fn refresh(&mut self) -> Result<&[Project]> {
        let fresh = self.store.list()?;
        log::debug!("Refreshed project cache: {} projects", fresh.len());
        self.projects = fresh;
        Ok(&self.projects)
    }

    /// Saves a draft and folds the stored row back into the cache. The
    /// saved project becomes the working project.
    pub fn save(&mut self, draft: &ProjectDraft) -> Result<Project> {
        let project = self.store.save(draft)?;
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => *slot = project.clone(),
            None => self.projects.insert(0, project.clone()),
        }
        self.projects
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.current_id = Some(project.id);
        Ok(project)
    }

    /// Deletes a project remotely, then drops it from the cache. The
    /// working project is cleared if it was the one deleted.
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.store.delete(id)?;
        self.projects.retain(|p| p.id != id);
        if self.current_id == Some(id) {
            self.current_id = None;
        }
        log::info!("Deleted project {}", id);
        Ok(())
    }

    /// Pushes the session buffers into the working project's code columns.
    /// Returns `Ok(false)` without touching the store when no working
    /// project is bound.
    pub fn autosave_buffers(&mut self, buffers: &SourceBuffers) -> Result<bool> {
        let id = match self.current_id {
            Some(id) => id,
            None => return Ok(false),
        };
        let draft = ProjectDraft::from_buffers(buffers).with_id(id);
        let project = self.store.save(&draft)?;
        if let Some(slot) = self.projects.iter_mut().find(|p| p.id == project.id) {
            *slot = project;
        }
        self.projects
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        log::debug!("Autosaved buffers to project {}", id);
        Ok(true)
    }

    /// Registers a callback for applied remote changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&[Project]) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Handles a change that originated outside this session: refreshes
    /// the full list, then informs subscribers.
    pub fn notify_remote_change(&mut self) -> Result<()> {
        self.refresh()?;
        for listener in &self.listeners {
            listener(&self.projects);
        }
        Ok(())
    }
}
