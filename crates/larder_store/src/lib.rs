//! Inventory store: the durable mapping from barcode to item record.
//!
//! Persistence goes through the [`SnapshotBackend`] trait so the atomic
//! write discipline can be exercised against an in-memory fake before
//! touching real files.

pub mod backend;
pub mod resolver;
pub mod store;

pub use backend::{FileBackend, LoadOutcome, MemoryBackend, SnapshotBackend};
pub use resolver::{NameLookup, NameResolver, NoLookup, Prompter, ResolveName, Resolved};
pub use store::InventoryStore;
