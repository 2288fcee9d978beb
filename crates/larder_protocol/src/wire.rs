//! Dashboard wire protocol.
//!
//! Newline-delimited JSON over TCP: each request line decodes to a
//! [`DashboardRequest`], each response line encodes a
//! [`DashboardResponse`].
//!
//! # Supported Operations
//!
//! - `Snapshot` / `Increment` / `Decrement`
//! - `ListSnapshots`
//! - `Ping`

use serde::{Deserialize, Serialize};

use crate::item::Snapshot;

/// Dashboard request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardRequest {
    /// Full snapshot of a target file (empty mapping if the file is missing)
    Snapshot { target: String },
    /// Increase the quantity of `code` by one
    Increment { target: String, code: String },
    /// Decrease the quantity of `code` by one, clamping at zero
    Decrement { target: String, code: String },
    /// Enumerate candidate snapshot files
    ListSnapshots,
    /// Ping/health check
    Ping,
}

/// Dashboard response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DashboardResponse {
    /// Full snapshot of the requested file
    Snapshot(Snapshot),
    /// Result of an increment/decrement
    Mutation(MutationOutcome),
    /// Candidate snapshot filenames
    Snapshots { files: Vec<String> },
    /// Ping reply
    Pong,
    /// Request-level failure (malformed request, storage error)
    Error { code: String, message: String },
}

/// Result of an increment/decrement call. A missing file or unknown code
/// is a structured failure, not a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
}

impl MutationOutcome {
    pub fn ok(quantity: u64) -> Self {
        Self {
            success: true,
            quantity: Some(quantity),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            quantity: None,
        }
    }
}
