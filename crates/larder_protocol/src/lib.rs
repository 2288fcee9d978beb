//! Shared types for the larder inventory engine.
//!
//! Holds the snapshot wire format, the control barcode vocabulary, the
//! dashboard request/response protocol, and canonical defaults. This crate
//! performs no I/O; everything here is plain data.

pub mod defaults;
pub mod item;
pub mod vocab;
pub mod wire;

pub use item::{Category, Item, Snapshot};
pub use vocab::{classify, is_control, ActionCode, ControlCode, FunctionCode, Mode};
pub use wire::{DashboardRequest, DashboardResponse, MutationOutcome};
