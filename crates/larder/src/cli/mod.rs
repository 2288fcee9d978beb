//! CLI command implementations.

pub mod config;
pub mod list;
pub mod ping;
pub mod scan;
pub mod serve;
pub mod snapshots;

use anyhow::Result;
use larder_dashboard::DashboardService;
use std::path::PathBuf;

/// Resolve a caller-supplied snapshot filename to a path in the data
/// directory, creating the directory on first use. The same whitelist as
/// the dashboard applies, so `larder scan` and `larder serve` agree on
/// which file a name means.
pub fn snapshot_path(target: &str) -> Result<PathBuf> {
    let data_dir = larder_logging::ensure_data_dir()?;
    Ok(data_dir.join(DashboardService::resolve_target(target)))
}
