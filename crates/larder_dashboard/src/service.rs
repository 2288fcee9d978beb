//! Concurrent query/update operations over snapshot files.

use anyhow::{Context, Result};
use larder_protocol::defaults::{DEFAULT_SNAPSHOT_FILE, SNAPSHOT_EXTENSION};
use larder_protocol::{MutationOutcome, Snapshot};
use larder_store::{FileBackend, LoadOutcome, SnapshotBackend};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

#[derive(Debug, Clone, Copy)]
enum MutationKind {
    Increment,
    Decrement,
}

/// Facade over the snapshot directory shared by concurrent callers.
///
/// The lock registry hands out one mutex per target filename; a mutation
/// holds it across the whole load -> mutate -> persist sequence. The lock
/// is process-wide only: another process writing the same file (the
/// interactive scan loop) can still race the service.
pub struct DashboardService {
    data_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DashboardService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Whitelist check on a caller-supplied target: plain base filenames
    /// with the snapshot extension only. Anything else (path separators,
    /// parent components, wrong extension) falls back to the default
    /// store name rather than touching an arbitrary path.
    pub fn resolve_target(target: &str) -> &str {
        let trimmed = target.trim();
        let is_plain = !trimmed.is_empty()
            && !trimmed.contains('/')
            && !trimmed.contains('\\')
            && !trimmed.starts_with('.')
            && Path::new(trimmed)
                .extension()
                .map(|ext| ext == SNAPSHOT_EXTENSION)
                .unwrap_or(false);
        if is_plain {
            trimmed
        } else {
            DEFAULT_SNAPSHOT_FILE
        }
    }

    fn lock_for(&self, target: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(target.to_string()).or_default().clone()
    }

    fn backend_for(&self, target: &str) -> FileBackend {
        FileBackend::new(self.data_dir.join(target))
    }

    /// Full snapshot of `target`. A missing or unreadable file is an empty
    /// mapping, not an error.
    pub async fn snapshot(&self, target: &str) -> Result<Snapshot> {
        let target = Self::resolve_target(target);
        let lock = self.lock_for(target);
        let _guard = lock.lock().await;

        match self.backend_for(target).load()? {
            LoadOutcome::Loaded(snapshot) => Ok(snapshot),
            LoadOutcome::Missing | LoadOutcome::Malformed => Ok(Snapshot::default()),
        }
    }

    /// Increase the quantity of `code` in `target` by one.
    pub async fn increment(&self, target: &str, code: &str) -> Result<MutationOutcome> {
        self.mutate(target, code, MutationKind::Increment).await
    }

    /// Decrease the quantity of `code` in `target` by one, clamping at
    /// zero. Decrementing an item already at zero succeeds with zero.
    pub async fn decrement(&self, target: &str, code: &str) -> Result<MutationOutcome> {
        self.mutate(target, code, MutationKind::Decrement).await
    }

    async fn mutate(&self, target: &str, code: &str, kind: MutationKind) -> Result<MutationOutcome> {
        let target = Self::resolve_target(target);
        let lock = self.lock_for(target);
        let _guard = lock.lock().await;

        let backend = self.backend_for(target);
        let mut snapshot = match backend.load()? {
            LoadOutcome::Loaded(snapshot) => snapshot,
            LoadOutcome::Missing | LoadOutcome::Malformed => {
                info!("Mutation target {} has no usable snapshot", target);
                return Ok(MutationOutcome::failed());
            }
        };

        let Some(item) = snapshot.items.get_mut(code) else {
            info!("Mutation code {} not present in {}", code, target);
            return Ok(MutationOutcome::failed());
        };
        item.quantity = match kind {
            MutationKind::Increment => item.quantity.saturating_add(1),
            MutationKind::Decrement => item.quantity.saturating_sub(1),
        };
        let quantity = item.quantity;

        backend.save(&snapshot)?;
        Ok(MutationOutcome::ok(quantity))
    }

    /// Candidate snapshot files in the data directory, sorted by name.
    pub fn list_snapshots(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read data directory: {}", self.data_dir.display())
                })
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            if Path::new(&name)
                .extension()
                .map(|ext| ext == SNAPSHOT_EXTENSION)
                .unwrap_or(false)
            {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_protocol::{Category, Item};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn write_snapshot(dir: &Path, name: &str, items: &[(&str, u64)]) {
        let mut snapshot = Snapshot::default();
        for (code, qty) in items {
            snapshot
                .items
                .insert(code.to_string(), Item::new("Thing", *qty, Category::Other));
        }
        FileBackend::new(dir.join(name)).save(&snapshot).unwrap();
    }

    #[test]
    fn test_resolve_target_whitelist() {
        assert_eq!(DashboardService::resolve_target("pantry.json"), "pantry.json");
        assert_eq!(
            DashboardService::resolve_target("../etc/passwd"),
            DEFAULT_SNAPSHOT_FILE
        );
        assert_eq!(
            DashboardService::resolve_target("sub/dir.json"),
            DEFAULT_SNAPSHOT_FILE
        );
        assert_eq!(
            DashboardService::resolve_target("notes.txt"),
            DEFAULT_SNAPSHOT_FILE
        );
        assert_eq!(DashboardService::resolve_target(""), DEFAULT_SNAPSHOT_FILE);
        assert_eq!(
            DashboardService::resolve_target(".hidden.json"),
            DEFAULT_SNAPSHOT_FILE
        );
    }

    #[tokio::test]
    async fn test_snapshot_of_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let service = DashboardService::new(dir.path());
        let snapshot = service.snapshot("pantry.json").await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_mutation_on_missing_file_fails_structurally() {
        let dir = tempdir().unwrap();
        let service = DashboardService::new(dir.path());
        let outcome = service.increment("pantry.json", "111").await.unwrap();
        assert_eq!(outcome, MutationOutcome::failed());
    }

    #[tokio::test]
    async fn test_mutation_on_unknown_code_fails_structurally() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "pantry.json", &[("111", 2)]);
        let service = DashboardService::new(dir.path());
        let outcome = service.increment("pantry.json", "404").await.unwrap();
        assert_eq!(outcome, MutationOutcome::failed());
    }

    #[tokio::test]
    async fn test_decrement_clamps_at_zero_and_succeeds() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "pantry.json", &[("111", 0)]);
        let service = DashboardService::new(dir.path());
        let outcome = service.decrement("pantry.json", "111").await.unwrap();
        assert_eq!(outcome, MutationOutcome::ok(0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_lose_no_updates() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "pantry.json", &[("111", 0)]);
        let service = Arc::new(DashboardService::new(dir.path()));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.increment("pantry.json", "111").await.unwrap()
            }));
        }
        for handle in handles {
            let outcome = handle.await.unwrap();
            assert!(outcome.success);
        }

        let snapshot = service.snapshot("pantry.json").await.unwrap();
        assert_eq!(snapshot.get("111").unwrap().quantity, 20);
    }

    #[tokio::test]
    async fn test_list_snapshots_filters_extension() {
        let dir = tempdir().unwrap();
        write_snapshot(dir.path(), "pantry.json", &[]);
        write_snapshot(dir.path(), "garage.json", &[]);
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let service = DashboardService::new(dir.path());
        assert_eq!(
            service.list_snapshots().unwrap(),
            vec!["garage.json".to_string(), "pantry.json".to_string()]
        );
    }
}
