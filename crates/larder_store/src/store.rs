//! Store operations over a snapshot backend.
//!
//! Every mutating operation reloads the durable snapshot first (reduces
//! divergence when independent processes share one file) and persists the
//! whole mapping on success. Operating on a missing code, a control code,
//! or an empty rename is an informational no-op, not an error.

use anyhow::{Context, Result};
use larder_protocol::{vocab, Item, Snapshot};
use std::sync::Arc;
use tracing::info;

use crate::backend::{LoadOutcome, SnapshotBackend};
use crate::resolver::ResolveName;

pub struct InventoryStore {
    backend: Arc<dyn SnapshotBackend>,
}

impl InventoryStore {
    pub fn new(backend: Arc<dyn SnapshotBackend>) -> Self {
        Self { backend }
    }

    /// Open a store over a JSON snapshot file.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(crate::backend::FileBackend::new(path)))
    }

    fn load(&self) -> Result<Snapshot> {
        match self.backend.load()? {
            LoadOutcome::Loaded(snapshot) => Ok(snapshot),
            LoadOutcome::Missing => {
                // First run: persist the empty mapping so readers see a file.
                let empty = Snapshot::default();
                self.backend.save(&empty).with_context(|| {
                    format!("Failed to initialize snapshot: {}", self.backend.describe())
                })?;
                Ok(empty)
            }
            // Backend already logged; keep the broken file for forensics.
            LoadOutcome::Malformed => Ok(Snapshot::default()),
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        self.backend
            .save(snapshot)
            .with_context(|| format!("Failed to persist snapshot: {}", self.backend.describe()))
    }

    /// Add `qty` to `code`, creating the item via `resolver` if unknown.
    pub fn add(&self, code: &str, qty: u64, resolver: &mut dyn ResolveName) -> Result<()> {
        if vocab::is_control(code) {
            info!("Ignoring control code {} as an inventory target", code);
            return Ok(());
        }
        let mut snapshot = self.load()?;
        match snapshot.items.get_mut(code) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(qty);
            }
            None => {
                let resolved = resolver.resolve(code)?;
                snapshot
                    .items
                    .insert(code.to_string(), Item::new(resolved.name, qty, resolved.category));
            }
        }
        self.persist(&snapshot)
    }

    /// Remove `qty` from `code`, clamping at zero.
    pub fn remove(&self, code: &str, qty: u64) -> Result<()> {
        if vocab::is_control(code) {
            info!("Ignoring control code {} as an inventory target", code);
            return Ok(());
        }
        let mut snapshot = self.load()?;
        let Some(item) = snapshot.items.get_mut(code) else {
            info!("Cannot remove {}: not in the inventory", code);
            return Ok(());
        };
        item.quantity = item.quantity.saturating_sub(qty);
        self.persist(&snapshot)
    }

    /// Remove the entry for `code` entirely.
    pub fn delete(&self, code: &str) -> Result<()> {
        if vocab::is_control(code) {
            info!("Ignoring control code {} as an inventory target", code);
            return Ok(());
        }
        let mut snapshot = self.load()?;
        if snapshot.items.remove(code).is_none() {
            info!("Cannot delete {}: not in the inventory", code);
            return Ok(());
        }
        self.persist(&snapshot)
    }

    /// Set the display name for `code`. Empty names (after trimming) and
    /// unknown codes are no-ops.
    pub fn rename(&self, code: &str, new_display_name: &str) -> Result<()> {
        let trimmed = new_display_name.trim();
        if trimmed.is_empty() {
            info!("Ignoring empty display name for {}", code);
            return Ok(());
        }
        let mut snapshot = self.load()?;
        let Some(item) = snapshot.items.get_mut(code) else {
            info!("Cannot rename {}: not in the inventory", code);
            return Ok(());
        };
        item.display_name = Some(trimmed.to_string());
        self.persist(&snapshot)
    }

    /// Current quantity of `code`, or `None` if unknown. Read-only.
    pub fn quantity(&self, code: &str) -> Result<Option<u64>> {
        let snapshot = self.load()?;
        Ok(snapshot.get(code).map(|item| item.quantity))
    }

    /// Full listing ordered by display name (case-insensitive, ties by
    /// code). Read-only.
    pub fn list(&self) -> Result<Vec<(String, Item)>> {
        let snapshot = self.load()?;
        Ok(snapshot
            .sorted()
            .into_iter()
            .map(|(code, item)| (code.to_string(), item.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::resolver::{Resolved, ResolveName};
    use larder_protocol::Category;

    /// Resolver returning a fixed answer; panics if consulted when it
    /// should not be.
    struct FixedResolver {
        name: &'static str,
        category: Category,
        calls: usize,
    }

    impl FixedResolver {
        fn new(name: &'static str, category: Category) -> Self {
            Self {
                name,
                category,
                calls: 0,
            }
        }
    }

    impl ResolveName for FixedResolver {
        fn resolve(&mut self, _code: &str) -> Result<Resolved> {
            self.calls += 1;
            Ok(Resolved {
                name: self.name.to_string(),
                category: self.category,
            })
        }
    }

    fn store_with_backend() -> (InventoryStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (InventoryStore::new(backend.clone()), backend)
    }

    #[test]
    fn test_add_creates_item_with_resolved_name() {
        let (store, backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Beans", Category::Food);
        store.add("012345678905", 1, &mut resolver).unwrap();

        let stored = backend.stored().unwrap();
        let item = stored.get("012345678905").unwrap();
        assert_eq!(item.name, "Beans");
        assert_eq!(item.display_name(), "Beans");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.category, Category::Food);
        assert_eq!(resolver.calls, 1);
    }

    #[test]
    fn test_add_existing_item_skips_resolver() {
        let (store, _backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Beans", Category::Food);
        store.add("111", 2, &mut resolver).unwrap();
        store.add("111", 3, &mut resolver).unwrap();
        assert_eq!(resolver.calls, 1);
        assert_eq!(store.quantity("111").unwrap(), Some(5));
    }

    #[test]
    fn test_remove_clamps_at_zero() {
        let (store, _backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Rice", Category::Food);
        store.add("222", 3, &mut resolver).unwrap();
        store.remove("222", 10).unwrap();
        assert_eq!(store.quantity("222").unwrap(), Some(0));
    }

    #[test]
    fn test_remove_missing_code_is_noop() {
        let (store, backend) = store_with_backend();
        store.remove("404", 1).unwrap();
        // The initial empty snapshot persisted by load, nothing else.
        assert!(backend.stored().unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_code_is_noop() {
        let (store, _backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Rice", Category::Food);
        store.add("222", 1, &mut resolver).unwrap();
        store.delete("404").unwrap();
        assert_eq!(store.quantity("222").unwrap(), Some(1));
    }

    #[test]
    fn test_delete_removes_entry() {
        let (store, backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Rice", Category::Food);
        store.add("222", 1, &mut resolver).unwrap();
        store.delete("222").unwrap();
        assert!(backend.stored().unwrap().is_empty());
    }

    #[test]
    fn test_control_codes_are_never_stored() {
        let (store, backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Bogus", Category::Other);
        for code in vocab::reserved_codes() {
            store.add(code, 1, &mut resolver).unwrap();
            store.remove(code, 1).unwrap();
            store.delete(code).unwrap();
        }
        assert_eq!(resolver.calls, 0);
        assert!(backend
            .stored()
            .map(|snapshot| snapshot.is_empty())
            .unwrap_or(true));
    }

    #[test]
    fn test_rename_sets_display_name_only() {
        let (store, backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Beans", Category::Food);
        store.add("111", 1, &mut resolver).unwrap();
        store.rename("111", "  Baked Beans  ").unwrap();

        let stored = backend.stored().unwrap();
        let item = stored.get("111").unwrap();
        assert_eq!(item.name, "Beans");
        assert_eq!(item.display_name(), "Baked Beans");
    }

    #[test]
    fn test_rename_empty_is_noop() {
        let (store, backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Beans", Category::Food);
        store.add("111", 1, &mut resolver).unwrap();
        let before = backend.save_count();
        store.rename("111", "   ").unwrap();
        assert_eq!(backend.save_count(), before);
    }

    #[test]
    fn test_malformed_backend_yields_empty_store_without_save() {
        let (store, backend) = store_with_backend();
        backend.mark_malformed();
        let before = backend.save_count();
        assert_eq!(store.quantity("anything").unwrap(), None);
        // Reads over a malformed snapshot never write the file.
        assert_eq!(backend.save_count(), before);
    }

    #[test]
    fn test_quantity_never_negative_over_random_ops() {
        let (store, _backend) = store_with_backend();
        let mut resolver = FixedResolver::new("Rice", Category::Food);
        let ops: [(bool, u64); 8] = [
            (true, 2),
            (false, 5),
            (true, 1),
            (false, 1),
            (false, 3),
            (true, 4),
            (false, 2),
            (false, 9),
        ];
        for (is_add, qty) in ops {
            if is_add {
                store.add("777", qty, &mut resolver).unwrap();
            } else {
                store.remove("777", qty).unwrap();
            }
            let quantity = store.quantity("777").unwrap().unwrap();
            assert!(quantity <= 7, "quantity stays within the added total");
        }
        assert_eq!(store.quantity("777").unwrap(), Some(0));
    }

    #[test]
    fn test_list_sorted_by_display_name() {
        let (store, _backend) = store_with_backend();
        let mut cheddar = FixedResolver::new("cheddar", Category::Food);
        let mut apples = FixedResolver::new("Apples", Category::Food);
        store.add("900", 1, &mut cheddar).unwrap();
        store.add("100", 1, &mut apples).unwrap();
        store.rename("900", "Aged Cheddar").unwrap();

        let listing = store.list().unwrap();
        let names: Vec<&str> = listing.iter().map(|(_, item)| item.display_name()).collect();
        assert_eq!(names, vec!["Aged Cheddar", "Apples"]);
    }
}
