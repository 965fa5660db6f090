//! Project persistence.
//!
//! This module provides:
//! - `ProjectStore` trait with in-memory and PostgREST implementations
//! - `ProjectCache` for the session's local view of the store
//! - Crash-recovery snapshots of the session buffers

pub mod cache;
pub mod project;
pub mod remote;
pub mod snapshot;

pub use cache::{ChangeListener, ProjectCache};
pub use project::{ImageRecord, Project, ProjectDraft, DEFAULT_TITLE};
pub use remote::{MemoryStore, ProjectStore, RestStore, DEFAULT_STORE_TIMEOUT_MS};
pub use snapshot::{Snapshot, SnapshotManager};
