//! Crash-recovery snapshots of the session buffers.
//!
//! Snapshots are timestamped JSON files written to a snapshot directory and
//! rotated to a maximum count. A content fingerprint keeps unchanged
//! buffers from producing new files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{Result, TriptychError};
use crate::session::SourceBuffers;

/// Default snapshot interval in seconds.
const DEFAULT_SNAPSHOT_INTERVAL: u64 = 60;

/// Default maximum number of snapshots to retain.
const DEFAULT_MAX_SNAPSHOTS: usize = 10;

/// Prefix for snapshot filenames.
const SNAPSHOT_PREFIX: &str = "snapshot_";

/// Extension for snapshot files.
const SNAPSHOT_EXTENSION: &str = ".json";

/// One recoverable point-in-time copy of the three buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub buffers: SourceBuffers,
    pub saved_at: DateTime<Utc>,
}

/// Writes, lists, and recovers buffer snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    /// Directory snapshots are written to.
    pub snapshot_dir: PathBuf,

    /// Interval between snapshots in seconds.
    pub interval_seconds: u64,

    /// Maximum number of snapshot files to retain.
    pub max_snapshots: usize,

    /// Timestamp of the last successful snapshot.
    pub last_save_time: Option<DateTime<Utc>>,

    last_fingerprint: Option<String>,
}

impl SnapshotManager {
    /// Creates a manager with the default interval (60s) and retention
    /// (10 files).
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self::with_limits(snapshot_dir, DEFAULT_SNAPSHOT_INTERVAL, DEFAULT_MAX_SNAPSHOTS)
    }

    /// Creates a manager with a custom interval and retention count.
    pub fn with_limits(snapshot_dir: impl Into<PathBuf>, interval: u64, max: usize) -> Self {
        SnapshotManager {
            snapshot_dir: snapshot_dir.into(),
            interval_seconds: interval,
            max_snapshots: max,
            last_save_time: None,
            last_fingerprint: None,
        }
    }

    /// Whether a snapshot should be taken now.
    ///
    /// Returns true when the buffers changed since the last snapshot and
    /// the interval has elapsed (or nothing was ever snapshotted).
    pub fn should_snapshot(&self, buffers: &SourceBuffers) -> bool {
        if self.last_fingerprint.as_deref() == Some(fingerprint(buffers).as_str()) {
            return false;
        }
        match self.last_save_time {
            None => true,
            Some(last_time) => {
                let elapsed = Utc::now().signed_duration_since(last_time);
                elapsed.num_seconds() >= self.interval_seconds as i64
            }
        }
    }

    /// Writes a snapshot of the buffers and rotates old files.
    ///
    /// Returns the path of the created file.
    pub fn snapshot(&mut self, buffers: &SourceBuffers) -> Result<PathBuf> {
        if !self.snapshot_dir.exists() {
            fs::create_dir_all(&self.snapshot_dir).map_err(|e| {
                TriptychError::DirectoryCreateError {
                    path: self.snapshot_dir.clone(),
                    source: e,
                }
            })?;
        }

        // Filename carries the timestamp: snapshot_YYYYMMDD_HHMMSS.json
        let now = Utc::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let filename = format!("{}{}{}", SNAPSHOT_PREFIX, timestamp, SNAPSHOT_EXTENSION);
        let snapshot_path = self.snapshot_dir.join(&filename);

        let record = Snapshot {
            buffers: buffers.clone(),
            saved_at: now,
        };
        let content = serde_json::to_string_pretty(&record)?;

        fs::write(&snapshot_path, content).map_err(|e| TriptychError::FileWriteError {
            path: snapshot_path.clone(),
            source: e,
        })?;

        self.last_save_time = Some(now);
        self.last_fingerprint = Some(fingerprint(buffers));
        log::info!("Snapshot written to {}", snapshot_path.display());

        self.rotate_snapshots()?;

        Ok(snapshot_path)
    }

    /// Deletes the oldest snapshots beyond the retention count.
    pub fn rotate_snapshots(&self) -> Result<()> {
        let mut snapshots = Self::list_snapshots(&self.snapshot_dir)?;

        // Sorted newest first, so pop from the end to drop the oldest.
        while snapshots.len() > self.max_snapshots {
            if let Some(oldest) = snapshots.pop() {
                fs::remove_file(&oldest).map_err(|e| TriptychError::FileWriteError {
                    path: oldest,
                    source: e,
                })?;
            }
        }

        Ok(())
    }

    /// Lists snapshot files in a directory, newest first by filename
    /// timestamp. A missing directory yields an empty list.
    pub fn list_snapshots(snapshot_dir: &Path) -> Result<Vec<PathBuf>> {
        if !snapshot_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots: Vec<PathBuf> = WalkDir::new(snapshot_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(SNAPSHOT_PREFIX)
                    && entry
                        .file_name()
                        .to_string_lossy()
                        .ends_with(SNAPSHOT_EXTENSION)
            })
            .map(|entry| entry.path().to_path_buf())
            .collect();

        snapshots.sort_by(|a, b| {
            let a_name = a.file_name().unwrap_or_default().to_string_lossy();
            let b_name = b.file_name().unwrap_or_default().to_string_lossy();
            b_name.cmp(&a_name)
        });

        Ok(snapshots)
    }

    /// The most recent snapshot file, if any exist.
    pub fn latest_snapshot(snapshot_dir: &Path) -> Result<Option<PathBuf>> {
        let snapshots = Self::list_snapshots(snapshot_dir)?;
        Ok(snapshots.into_iter().next())
    }

    /// Loads one snapshot file.
    pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
        let content = fs::read_to_string(path).map_err(|e| TriptychError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the most recent snapshot in a directory.
    pub fn recover_latest(snapshot_dir: &Path) -> Result<Snapshot> {
        match Self::latest_snapshot(snapshot_dir)? {
            Some(path) => {
                log::info!("Recovering from {}", path.display());
                Self::load_snapshot(&path)
            }
            None => Err(TriptychError::NoSnapshotFound),
        }
    }
}

/// Content fingerprint across all three panes. Panes are hashed with a
/// separator so content moving between panes changes the fingerprint.
fn fingerprint(buffers: &SourceBuffers) -> String {
    let mut hasher = Sha256::new();
    hasher.update(buffers.markup.as_bytes());
    hasher.update([0u8]);
    hasher.update(buffers.style.as_bytes());
    hasher.update([0u8]);
    hasher.update(buffers.script.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_creates_defaults() {
        let manager = SnapshotManager::new("/tmp/snapshots");
        assert_eq!(manager.interval_seconds, DEFAULT_SNAPSHOT_INTERVAL);
        assert_eq!(manager.max_snapshots, DEFAULT_MAX_SNAPSHOTS);
        assert!(manager.last_save_time.is_none());
    }

    #[test]
    fn test_with_limits_creates_custom() {
        let manager = SnapshotManager::with_limits("/tmp/snapshots", 120, 5);
        assert_eq!(manager.interval_seconds, 120);
        assert_eq!(manager.max_snapshots, 5);
    }

    #[test]
    fn test_should_snapshot_on_first_change() {
        let manager = SnapshotManager::new("/tmp/snapshots");
        assert!(manager.should_snapshot(&SourceBuffers::new()));
    }

    #[test]
    fn test_should_not_snapshot_unchanged_buffers() {
        let temp = tempdir().unwrap();
        let mut manager = SnapshotManager::with_limits(temp.path(), 0, 10);
        let buffers = SourceBuffers::new();

        manager.snapshot(&buffers).unwrap();
        assert!(!manager.should_snapshot(&buffers));

        let mut changed = buffers.clone();
        changed.markup.push_str("<p>more</p>");
        assert!(manager.should_snapshot(&changed));
    }

    #[test]
    fn test_pane_swap_changes_fingerprint() {
        let a = SourceBuffers::from_parts("x", "", "");
        let b = SourceBuffers::from_parts("", "x", "");
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn test_snapshot_and_recover_round_trip() {
        let temp = tempdir().unwrap();
        let mut manager = SnapshotManager::new(temp.path());
        let buffers = SourceBuffers::from_parts("<p>hi</p>", "p { color: red; }", "go();");

        let path = manager.snapshot(&buffers).unwrap();
        assert!(path.exists());

        let recovered = SnapshotManager::recover_latest(temp.path()).unwrap();
        assert_eq!(recovered.buffers, buffers);
    }

    #[test]
    fn test_list_snapshots_empty_dir() {
        let temp = tempdir().unwrap();
        let result = SnapshotManager::list_snapshots(temp.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_list_snapshots_nonexistent_dir() {
        let path = PathBuf::from("/nonexistent/path/that/does/not/exist");
        let result = SnapshotManager::list_snapshots(&path).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_list_snapshots_filters_and_sorts_newest_first() {
        let temp = tempdir().unwrap();

        fs::write(temp.path().join("snapshot_20240115_100000.json"), "{}").unwrap();
        fs::write(temp.path().join("snapshot_20240115_120000.json"), "{}").unwrap();
        fs::write(temp.path().join("snapshot_20240115_110000.json"), "{}").unwrap();
        fs::write(temp.path().join("other_file.json"), "{}").unwrap();
        fs::write(temp.path().join("snapshot_incomplete"), "{}").unwrap();

        let result = SnapshotManager::list_snapshots(temp.path()).unwrap();
        let names: Vec<String> = result
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "snapshot_20240115_120000.json",
                "snapshot_20240115_110000.json",
                "snapshot_20240115_100000.json",
            ]
        );
    }

    #[test]
    fn test_rotate_snapshots_removes_oldest() {
        let temp = tempdir().unwrap();

        for i in 0..5 {
            fs::write(
                temp.path()
                    .join(format!("snapshot_20240115_10000{}.json", i)),
                "{}",
            )
            .unwrap();
        }

        let manager = SnapshotManager::with_limits(temp.path(), 60, 3);
        manager.rotate_snapshots().unwrap();

        let remaining = SnapshotManager::list_snapshots(temp.path()).unwrap();
        assert_eq!(remaining.len(), 3);

        let names: Vec<String> = remaining
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"snapshot_20240115_100004.json".to_string()));
        assert!(names.contains(&"snapshot_20240115_100002.json".to_string()));
    }

    #[test]
    fn test_recover_with_no_snapshots_fails() {
        let temp = tempdir().unwrap();
        let err = SnapshotManager::recover_latest(temp.path()).unwrap_err();
        assert_eq!(err.error_code(), "NO_SNAPSHOT_FOUND");
    }
}
