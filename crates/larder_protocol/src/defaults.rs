//! Canonical default values shared across the scan loop and the dashboard.

/// Base filename of the default inventory snapshot.
pub const DEFAULT_SNAPSHOT_FILE: &str = "inventory.json";

/// Extension accepted by the dashboard target whitelist.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Default dashboard bind address (TCP loopback).
pub const DEFAULT_DASHBOARD_ADDR: &str = "127.0.0.1:7411";

/// Sentinel name assigned when the user declines to name an item.
pub const FALLBACK_ITEM_NAME: &str = "Miscellaneous";

/// Quantity applied when a follow-up quantity prompt gets no usable answer.
pub const DEFAULT_ACTION_QUANTITY: u64 = 1;
