//! Snapshot persistence backends.

use anyhow::{Context, Result};
use larder_protocol::Snapshot;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Result of loading the durable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot parsed successfully.
    Loaded(Snapshot),
    /// No snapshot on disk yet.
    Missing,
    /// A snapshot exists but did not parse. The file is left untouched so
    /// nothing is silently lost.
    Malformed,
}

/// Narrow persistence interface for the inventory mapping.
pub trait SnapshotBackend: Send + Sync {
    fn load(&self) -> Result<LoadOutcome>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
    /// Human-readable location for diagnostics.
    fn describe(&self) -> String;
}

/// JSON file backend with atomic replace semantics.
///
/// Saves stage the full snapshot into a temp file in the target's
/// directory and promote it with a rename, so a reader never observes a
/// partial snapshot even if the writer dies mid-save.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .with_context(|| format!("Snapshot path has no filename: {}", self.path.display()))?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        // Staged next to the target so the rename stays on one filesystem.
        Ok(dir.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self) -> Result<LoadOutcome> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome::Missing)
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))
            }
        };

        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => Ok(LoadOutcome::Loaded(snapshot)),
            Err(err) => {
                warn!(
                    "Malformed snapshot {} ({}); starting from an empty store, file left untouched",
                    self.path.display(),
                    err
                );
                Ok(LoadOutcome::Malformed)
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create snapshot directory: {}", dir.display())
                })?;
            }
        }

        let temp_path = self.temp_path()?;
        let data = serde_json::to_vec_pretty(snapshot).context("Failed to encode snapshot")?;

        if let Err(err) = std::fs::write(&temp_path, &data) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err).with_context(|| {
                format!("Failed to write temp snapshot: {}", temp_path.display())
            });
        }

        if let Err(err) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err).with_context(|| {
                format!(
                    "Failed to rename {} -> {}",
                    temp_path.display(),
                    self.path.display()
                )
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<Snapshot>,
    malformed: bool,
    fail_saves: bool,
    save_count: usize,
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the stored snapshot.
    pub fn seed(&self, snapshot: Snapshot) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.snapshot = Some(snapshot);
        state.malformed = false;
    }

    /// Make subsequent loads report a malformed snapshot.
    pub fn mark_malformed(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.malformed = true;
    }

    /// Make subsequent saves fail.
    pub fn fail_saves(&self, fail: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.fail_saves = fail;
    }

    /// Currently stored snapshot, if any.
    pub fn stored(&self) -> Option<Snapshot> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.snapshot.clone()
    }

    pub fn save_count(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.save_count
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> Result<LoadOutcome> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.malformed {
            return Ok(LoadOutcome::Malformed);
        }
        match &state.snapshot {
            Some(snapshot) => Ok(LoadOutcome::Loaded(snapshot.clone())),
            None => Ok(LoadOutcome::Missing),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail_saves {
            anyhow::bail!("Simulated save failure");
        }
        state.snapshot = Some(snapshot.clone());
        state.malformed = false;
        state.save_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
